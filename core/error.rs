// Error types for message validation and expression evaluation
use crate::types::MessageKind;
use thiserror::Error;

/// A received line that does not form a valid message for this protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,

    #[error("protocol tag mismatch: expected {expected:?}, found {found:?}")]
    TagMismatch { expected: String, found: String },

    #[error("message has no kind field")]
    MissingKind,

    #[error("unknown message kind {0:?}")]
    UnknownKind(String),

    #[error("unexpected {0} message")]
    UnexpectedKind(MessageKind),

    #[error("{0} message has no payload")]
    MissingPayload(MessageKind),

    #[error("invalid {kind} payload {payload:?}")]
    InvalidPayload { kind: MessageKind, payload: String },
}

/// Failure to evaluate an expression.
///
/// Only [`EvalError::ArithmeticUndefined`] is reported back to the server;
/// every other variant means the expression itself is ill-formed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("arithmetic operation is undefined")]
    ArithmeticUndefined,

    #[error("malformed token {0:?}")]
    MalformedToken(String),

    #[error("operator `{0}` is missing an operand")]
    MissingOperand(&'static str),

    #[error("unbalanced grouping symbols")]
    UnbalancedGroup,

    #[error("expression has no operands")]
    Empty,
}

impl EvalError {
    /// True when the session may continue after reporting this failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EvalError::ArithmeticUndefined)
    }
}
