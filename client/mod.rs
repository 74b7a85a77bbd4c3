// client: drives the HELLO / EVAL / BYE exchange with the grading server
pub mod config;
pub mod error;
pub mod session;

#[cfg(test)]
mod mock;

pub use config::{ClientConfig, DEFAULT_PORT};
pub use error::{ClientError, Result};
pub use session::Session;

use calc_core::{evaluate_fields, EvalError, Message, ProtocolError};
use calc_transport::{TcpTransport, TlsTransport, Transport};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Handshaking,
    Evaluating,
    Terminated,
    Failed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    /// Expressions answered with STATUS
    pub evaluated: u64,
    /// Expressions answered with ERR
    pub errors_reported: u64,
}

pub struct Client {
    session: Session,
    tag: String,
    state: SessionState,
    stats: SessionStats,
}

impl Client {
    /// Open a TLS (or plain TCP) connection as described by `config`.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let mut transport: Box<dyn Transport> = if config.tls {
            Box::new(
                TlsTransport::new(&config.host, config.port)
                    .with_verification(config.verify_certificates)
                    .with_timeout(config.timeout),
            )
        } else {
            Box::new(TcpTransport::new(&config.address()).with_timeout(config.timeout))
        };
        transport.connect()?;
        info!(address = %config.address(), tls = config.tls, "connected");

        Ok(Self::with_transport(transport, config))
    }

    /// Use a transport that is already connected.
    pub fn with_transport(transport: Box<dyn Transport>, config: &ClientConfig) -> Self {
        Client {
            session: Session::new(transport, config.recv_buffer, config.max_line),
            tag: config.tag.clone(),
            state: SessionState::Connected,
            stats: SessionStats::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Greet the server and answer expressions until BYE; returns the secret.
    ///
    /// The connection is closed before this returns, on success or failure.
    pub fn run(&mut self, username: &str) -> Result<String> {
        let result = self.drive(username);
        self.state = match result {
            Ok(_) => SessionState::Terminated,
            Err(_) => SessionState::Failed,
        };
        self.session.close();

        match &result {
            Ok(_) => info!(
                evaluated = self.stats.evaluated,
                errors_reported = self.stats.errors_reported,
                "session terminated"
            ),
            Err(e) => warn!(error = %e, state = ?self.state, "session failed"),
        }
        result
    }

    fn drive(&mut self, username: &str) -> Result<String> {
        self.state = SessionState::Handshaking;
        self.send(&Message::Hello {
            username: username.to_string(),
        })?;

        loop {
            let line = self.session.receive()?;
            debug!(%line, "received");

            match Message::decode(&line, &self.tag)? {
                Message::Eval { tokens } => {
                    self.state = SessionState::Evaluating;
                    self.respond(&tokens)?;
                }
                Message::Bye { secret } => return Ok(secret),
                other => return Err(ProtocolError::UnexpectedKind(other.kind()).into()),
            }
        }
    }

    fn respond(&mut self, tokens: &[String]) -> Result<()> {
        let reply = match evaluate_fields(tokens.iter().map(String::as_str)) {
            Ok(value) => {
                self.stats.evaluated += 1;
                Message::Status { value }
            }
            Err(EvalError::ArithmeticUndefined) => {
                debug!(expression = %tokens.join(" "), "undefined, reporting error");
                self.stats.errors_reported += 1;
                Message::division_error()
            }
            Err(e) => {
                warn!(expression = %tokens.join(" "), error = %e, "malformed expression");
                return Err(e.into());
            }
        };
        self.send(&reply)
    }

    fn send(&mut self, msg: &Message) -> Result<()> {
        self.session.send(&msg.encode(&self.tag))?;
        Ok(())
    }
}
