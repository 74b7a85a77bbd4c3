// Client error type: everything that ends a session early
use calc_core::{EvalError, ProtocolError};
use calc_transport::TransportError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("could not evaluate expression: {0}")]
    Eval(#[from] EvalError),
}
