// Transport abstraction - the session only needs an ordered byte stream
use crate::error::Result;

pub trait Transport: Send {
    /// Write all of `data`; returns the number of bytes written.
    fn send(&mut self, data: &[u8]) -> Result<usize>;
    /// Read at most `buf.len()` bytes; `Ok(0)` means the peer closed.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize>;
    fn connect(&mut self) -> Result<()>;
    fn disconnect(&mut self) -> Result<()>;
    fn is_connected(&self) -> bool;
}
