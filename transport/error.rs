//! Transport layer errors.

use thiserror::Error;

/// Result type alias.
pub type Result<T> = core::result::Result<T, TransportError>;

/// Failures establishing, reading from or writing to the connection.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid server name {0:?}")]
    InvalidHost(String),

    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("not connected")]
    NotConnected,

    #[error("connection closed by peer")]
    Closed,

    #[error("received bytes are not valid UTF-8")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("line exceeds {limit} bytes without a newline")]
    LineTooLong { limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
