// Line-framed session over a connected transport
use calc_transport::{Transport, TransportError};
use tracing::{trace, warn};

pub struct Session {
    transport: Box<dyn Transport>,
    buffer: Vec<u8>,
    pending_data: Vec<u8>,
    max_line: usize,
}

impl Session {
    /// Wrap an already connected transport. `recv_buffer` bounds each read,
    /// `max_line` bounds how much unterminated data is buffered.
    pub fn new(transport: Box<dyn Transport>, recv_buffer: usize, max_line: usize) -> Self {
        Session {
            transport,
            buffer: vec![0u8; recv_buffer.max(1)],
            pending_data: Vec::new(),
            max_line,
        }
    }

    pub fn send(&mut self, text: &str) -> Result<(), TransportError> {
        trace!(line = text.trim_end(), "send");
        let n = self.transport.send(text.as_bytes())?;
        if n != text.len() {
            return Err(std::io::Error::from(std::io::ErrorKind::WriteZero).into());
        }
        Ok(())
    }

    /// Return the next line without its terminator.
    ///
    /// Partial reads are buffered until a newline arrives; several lines in
    /// one read are handed out one call at a time. Unterminated data left
    /// when the peer closes is returned as a final line.
    pub fn receive(&mut self) -> Result<String, TransportError> {
        loop {
            if let Some(pos) = self.pending_data.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.pending_data.drain(..=pos).collect();
                return Self::decode(line);
            }
            if self.pending_data.len() > self.max_line {
                return Err(TransportError::LineTooLong {
                    limit: self.max_line,
                });
            }

            let n = self.transport.receive(&mut self.buffer)?;
            if n == 0 {
                if self.pending_data.is_empty() {
                    return Err(TransportError::Closed);
                }
                let line = std::mem::take(&mut self.pending_data);
                return Self::decode(line);
            }
            self.pending_data.extend_from_slice(&self.buffer[..n]);
        }
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_connected()
    }

    /// Close the underlying transport. Safe to call more than once.
    pub fn close(&mut self) {
        if self.transport.is_connected() {
            if let Err(e) = self.transport.disconnect() {
                warn!(error = %e, "disconnect failed");
            }
        }
    }

    fn decode(line: Vec<u8>) -> Result<String, TransportError> {
        let text = String::from_utf8(line)?;
        let text = text.trim_end_matches(|c| c == '\n' || c == '\r').to_string();
        trace!(line = %text, "recv");
        Ok(text)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
