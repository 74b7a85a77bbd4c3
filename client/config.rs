// Client configuration: CLI values plus environment overrides
use calc_core::PROTOCOL_TAG;
use std::env;
use std::time::Duration;

// Environment variables for configuration
// CALC_PROTOCOL_TAG: Tag expected on every message (default: cs5700spring2023)
// CALC_RECV_BUFFER: Max bytes per transport read (default: 16384)
// CALC_MAX_LINE: Max buffered bytes without a newline (default: 1 MiB)
// CALC_TIMEOUT_MS: Read/write timeout, 0 disables (default: 0)
// CALC_TLS_VERIFY: 1 verifies the server certificate (default: 0)

pub const DEFAULT_PORT: u16 = 27995;
const DEFAULT_RECV_BUFFER: usize = 16384;
const DEFAULT_MAX_LINE: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub tls: bool,
    pub tag: String,
    pub recv_buffer: usize,
    pub max_line: usize,
    pub timeout: Option<Duration>,
    pub verify_certificates: bool,
}

impl ClientConfig {
    pub fn new(host: &str, port: u16) -> Self {
        ClientConfig {
            host: host.to_string(),
            port,
            tls: true,
            tag: PROTOCOL_TAG.to_string(),
            recv_buffer: DEFAULT_RECV_BUFFER,
            max_line: DEFAULT_MAX_LINE,
            timeout: None,
            verify_certificates: false,
        }
    }

    pub fn from_env(host: &str, port: u16) -> Self {
        Self::from_lookup(host, port, |key| env::var(key).ok())
    }

    /// Build from defaults, overriding with whatever `lookup` returns.
    /// Unparseable or zero sizes keep the default.
    pub fn from_lookup<F>(host: &str, port: u16, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(host, port);

        if let Some(tag) = lookup("CALC_PROTOCOL_TAG").filter(|t| !t.trim().is_empty()) {
            config.tag = tag.trim().to_string();
        }
        if let Some(size) = parse_nonzero(lookup("CALC_RECV_BUFFER")) {
            config.recv_buffer = size;
        }
        if let Some(size) = parse_nonzero(lookup("CALC_MAX_LINE")) {
            config.max_line = size;
        }
        config.timeout = lookup("CALC_TIMEOUT_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis);
        config.verify_certificates = lookup("CALC_TLS_VERIFY")
            .map(|s| matches!(s.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        config
    }

    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_nonzero(value: Option<String>) -> Option<usize> {
    value
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
}
