// Transport module: byte-stream channels to the server
pub mod error;
pub mod traits;
pub mod tcp;
pub mod tls;

pub use error::*;
pub use traits::*;
pub use tcp::*;
pub use tls::*;
