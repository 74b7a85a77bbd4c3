// TLS transport: rustls client session over a blocking TcpStream
use crate::error::{Result, TransportError};
use crate::tcp::open_stream;
use crate::traits::Transport;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct TlsTransport {
    host: String,
    port: u16,
    verify_certificates: bool,
    timeout: Option<Duration>,
    stream: Option<StreamOwned<ClientConnection, TcpStream>>,
}

impl TlsTransport {
    pub fn new(host: &str, port: u16) -> Self {
        TlsTransport {
            host: host.to_string(),
            port,
            verify_certificates: false,
            timeout: None,
            stream: None,
        }
    }

    /// Verify the server chain against the bundled web PKI roots.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_certificates = verify;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn client_config(&self) -> ClientConfig {
        if self.verify_certificates {
            let roots = RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            ClientConfig::builder()
                .with_root_certificates(roots)
                .with_no_client_auth()
        } else {
            ClientConfig::builder()
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate))
                .with_no_client_auth()
        }
    }
}

impl Transport for TlsTransport {
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
        let server_name = ServerName::try_from(self.host.clone())
            .map_err(|_| TransportError::InvalidHost(self.host.clone()))?;
        let conn = ClientConnection::new(Arc::new(self.client_config()), server_name)?;

        let address = format!("{}:{}", self.host, self.port);
        let sock = open_stream(&address, self.timeout)?;
        let mut stream = StreamOwned::new(conn, sock);

        // Finish the handshake here so failures surface as connect errors
        while stream.conn.is_handshaking() {
            stream.conn.complete_io(&mut stream.sock)?;
        }
        debug!(
            %address,
            version = ?stream.conn.protocol_version(),
            suite = ?stream.conn.negotiated_cipher_suite().map(|s| s.suite()),
            "tls established"
        );

        self.stream = Some(stream);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            stream.conn.send_close_notify();
            // Best effort, the server usually closes first after BYE
            let _ = stream.conn.complete_io(&mut stream.sock);
            let _ = stream.sock.shutdown(Shutdown::Both);
            debug!(host = %self.host, port = self.port, "tls disconnected");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

/// Accepts any server certificate.
///
/// **WARNING:** the connection is encrypted but the server is not
/// authenticated. Enable verification when the server has a trusted chain.
#[derive(Debug)]
struct AcceptAnyCertificate;

impl rustls::client::danger::ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> core::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> core::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> core::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        vec![
            rustls::SignatureScheme::RSA_PKCS1_SHA256,
            rustls::SignatureScheme::RSA_PKCS1_SHA384,
            rustls::SignatureScheme::RSA_PKCS1_SHA512,
            rustls::SignatureScheme::RSA_PSS_SHA256,
            rustls::SignatureScheme::RSA_PSS_SHA384,
            rustls::SignatureScheme::RSA_PSS_SHA512,
            rustls::SignatureScheme::ECDSA_NISTP256_SHA256,
            rustls::SignatureScheme::ECDSA_NISTP384_SHA384,
            rustls::SignatureScheme::ED25519,
        ]
    }
}
