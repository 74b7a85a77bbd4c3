// Scripted in-memory transport for unit tests
use calc_transport::{Result, Transport, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockState {
    written: Vec<u8>,
    connected: bool,
    disconnects: usize,
}

/// Hands out the scripted chunks one per `receive`, then reports EOF.
pub(crate) struct MockTransport {
    inbound: VecDeque<Vec<u8>>,
    fail_send: bool,
    state: Arc<Mutex<MockState>>,
}

#[derive(Clone)]
pub(crate) struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub(crate) fn new<'a, I>(chunks: I) -> (Self, MockHandle)
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let state = Arc::new(Mutex::new(MockState {
            connected: true,
            ..MockState::default()
        }));
        let transport = MockTransport {
            inbound: chunks.into_iter().map(|c| c.to_vec()).collect(),
            fail_send: false,
            state: Arc::clone(&state),
        };
        (transport, MockHandle { state })
    }

    pub(crate) fn from_lines(lines: &[&str]) -> (Self, MockHandle) {
        let chunks: Vec<String> = lines.iter().map(|l| format!("{}\n", l)).collect();
        Self::new(chunks.iter().map(|c| c.as_bytes()))
    }

    pub(crate) fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }
}

impl MockHandle {
    pub(crate) fn written(&self) -> String {
        String::from_utf8_lossy(&self.state.lock().unwrap().written).into_owned()
    }

    pub(crate) fn disconnects(&self) -> usize {
        self.state.lock().unwrap().disconnects
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }
}

impl Transport for MockTransport {
    fn send(&mut self, data: &[u8]) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        if !state.connected {
            return Err(TransportError::NotConnected);
        }
        if self.fail_send {
            return Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe).into());
        }
        state.written.extend_from_slice(data);
        Ok(data.len())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.state.lock().unwrap().connected {
            return Err(TransportError::NotConnected);
        }
        let Some(mut chunk) = self.inbound.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.inbound.push_front(chunk.split_off(n));
        }
        Ok(n)
    }

    fn connect(&mut self) -> Result<()> {
        self.state.lock().unwrap().connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.connected = false;
        state.disconnects += 1;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }
}
