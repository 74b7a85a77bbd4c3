// Plain TCP transport implementation
use crate::error::{Result, TransportError};
use crate::traits::Transport;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;
use tracing::debug;

pub struct TcpTransport {
    address: String,
    timeout: Option<Duration>,
    stream: Option<TcpStream>,
}

impl TcpTransport {
    pub fn new(address: &str) -> Self {
        TcpTransport {
            address: address.to_string(),
            timeout: None,
            stream: None,
        }
    }

    /// Read/write timeout applied on connect; `None` blocks indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Open a TCP connection and apply the read/write timeout.
pub(crate) fn open_stream(address: &str, timeout: Option<Duration>) -> Result<TcpStream> {
    let stream = TcpStream::connect(address).map_err(|source| TransportError::Connect {
        address: address.to_string(),
        source,
    })?;
    stream.set_read_timeout(timeout)?;
    stream.set_write_timeout(timeout)?;
    debug!(%address, ?timeout, "tcp connected");
    Ok(stream)
}

impl Transport for TcpTransport {
    fn send(&mut self, data: &[u8]) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        stream.write_all(data)?;
        stream.flush()?;
        Ok(data.len())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        Ok(stream.read(buf)?)
    }

    fn connect(&mut self) -> Result<()> {
        self.stream = Some(open_stream(&self.address, self.timeout)?);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            // Peer may already be gone
            let _ = stream.shutdown(Shutdown::Both);
            debug!(address = %self.address, "tcp disconnected");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_not_connected() {
        let mut transport = TcpTransport::new("127.0.0.1:1");
        let mut buf = [0u8; 8];
        assert!(matches!(transport.send(b"x"), Err(TransportError::NotConnected)));
        assert!(matches!(transport.receive(&mut buf), Err(TransportError::NotConnected)));
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_echo_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 16];
            let n = stream.read(&mut buf).unwrap();
            stream.write_all(&buf[..n]).unwrap();
        });

        let mut transport = TcpTransport::new(&addr.to_string())
            .with_timeout(Some(Duration::from_secs(5)));
        transport.connect().unwrap();
        assert!(transport.is_connected());
        assert_eq!(transport.send(b"ping\n").unwrap(), 5);

        let mut buf = [0u8; 16];
        let n = transport.receive(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"ping\n");

        transport.disconnect().unwrap();
        assert!(!transport.is_connected());
        server.join().unwrap();
    }

    #[test]
    fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut transport = TcpTransport::new(&addr.to_string());
        assert!(matches!(transport.connect(), Err(TransportError::Connect { .. })));
    }
}
