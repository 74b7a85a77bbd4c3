// Core module: wire format, tokens and expression evaluation (NO I/O dependencies)
pub mod error;
pub mod types;
pub mod protocol;
pub mod eval;

pub use error::*;
pub use types::*;
pub use protocol::*;
pub use eval::*;
