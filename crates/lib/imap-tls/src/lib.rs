//! TLS setup for IMAP connections.
//!
//! The server name is validated and the trust store is built before any
//! bytes are exchanged, so configuration mistakes surface without touching
//! the network beyond the TCP connect.

use std::sync::Arc;

use rustls::pki_types::ServerName;

/// TLS stream type used for IMAP connections.
pub type TlsStream = tokio_rustls::client::TlsStream<tokio::net::TcpStream>;

/// How to secure the IMAP connection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TlsMode {
    /// Implicit TLS (usually port 993).
    Implicit,

    /// Start with plaintext and upgrade using STARTTLS (usually port 143).
    StartTls,
}

/// Errors returned while preparing TLS for a server.
#[derive(Debug, thiserror::Error)]
pub enum TlsSetupError {
    /// The server name cannot be used for certificate verification.
    #[error("invalid TLS server name \"{0}\"")]
    InvalidServerName(String),

    /// The system trust store could not be read.
    #[error("failed to load system root certificates: {0}")]
    RootCerts(#[source] rustls_native_certs::Error),

    /// The system trust store holds no usable certificate.
    #[error("no usable system root certificates ({ignored} ignored)")]
    NoRootCerts {
        /// Certificates that failed to parse.
        ignored: usize,
    },
}

/// Errors returned while bringing up a secured IMAP client.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// TLS could not be prepared.
    #[error(transparent)]
    Setup(#[from] TlsSetupError),

    /// The TLS handshake failed.
    #[error("TLS handshake: {0}")]
    Handshake(#[source] std::io::Error),

    /// IMAP protocol error before login.
    #[error("IMAP error: {0}")]
    Imap(#[from] async_imap::error::Error),

    /// The server did not send the expected greeting.
    #[error("IMAP server sent no greeting")]
    MissingGreeting,
}

/// Everything needed to wrap a TCP stream in TLS for one server.
#[derive(Clone)]
pub struct Upgrader {
    /// Connector trusting the system roots.
    connector: tokio_rustls::TlsConnector,

    /// Name the server certificate must match.
    server_name: ServerName<'static>,
}

impl std::fmt::Debug for Upgrader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upgrader")
            .field("server_name", &self.server_name)
            .finish_non_exhaustive()
    }
}

impl Upgrader {
    /// Validate the server name, then load the system trust store.
    pub fn new(tls_server_name: &str) -> Result<Self, TlsSetupError> {
        let server_name = parse_server_name(tls_server_name)?;

        let rustls_native_certs::CertificateResult { certs, errors, .. } =
            rustls_native_certs::load_native_certs();
        if let Some(error) = errors.into_iter().next() {
            return Err(TlsSetupError::RootCerts(error));
        }

        let mut roots = rustls::RootCertStore::empty();
        let (added, ignored) = roots.add_parsable_certificates(certs);
        if added == 0 {
            return Err(TlsSetupError::NoRootCerts { ignored });
        }
        tracing::debug!(added, ignored, "loaded system root certificates");

        Ok(Self::with_roots(roots, server_name))
    }

    /// Build an upgrader over an explicit trust store.
    fn with_roots(roots: rustls::RootCertStore, server_name: ServerName<'static>) -> Self {
        let config = rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        Self {
            connector: tokio_rustls::TlsConnector::from(Arc::new(config)),
            server_name,
        }
    }

    /// Run the TLS handshake over `stream`.
    pub async fn upgrade(
        &self,
        stream: tokio::net::TcpStream,
    ) -> Result<TlsStream, ConnectError> {
        self.connector
            .connect(self.server_name.clone(), stream)
            .await
            .map_err(ConnectError::Handshake)
    }
}

/// Parse a DNS name or IP address usable for certificate verification.
fn parse_server_name(name: &str) -> Result<ServerName<'static>, TlsSetupError> {
    ServerName::try_from(name.to_owned())
        .map_err(|_| TlsSetupError::InvalidServerName(name.to_owned()))
}

/// Read the server greeting, which must precede any command.
async fn expect_greeting<S>(client: &mut async_imap::Client<S>) -> Result<(), ConnectError>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
{
    client
        .read_response()
        .await
        .ok_or(ConnectError::MissingGreeting)?
        .map_err(async_imap::error::Error::from)?;
    Ok(())
}

/// Secure the TCP stream according to the TLS mode and wait for the
/// server greeting.
///
/// With [`TlsMode::StartTls`] the greeting is read in plaintext before the
/// upgrade; with [`TlsMode::Implicit`] it is read over TLS.
pub async fn connect(
    tcp_stream: tokio::net::TcpStream,
    upgrader: &Upgrader,
    tls_mode: TlsMode,
) -> Result<async_imap::Client<TlsStream>, ConnectError> {
    match tls_mode {
        TlsMode::Implicit => {
            let mut client = async_imap::Client::new(upgrader.upgrade(tcp_stream).await?);
            expect_greeting(&mut client).await?;
            Ok(client)
        }
        TlsMode::StartTls => {
            let mut client = async_imap::Client::new(tcp_stream);
            expect_greeting(&mut client).await?;
            client.run_command_and_check_ok("STARTTLS", None).await?;
            tracing::debug!("STARTTLS accepted, upgrading");

            let tls_stream = upgrader.upgrade(client.into_inner()).await?;
            Ok(async_imap::Client::new(tls_stream))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_server_name_before_loading_roots() {
        let error = Upgrader::new("not a host name").unwrap_err();
        assert!(
            matches!(error, TlsSetupError::InvalidServerName(ref name) if name == "not a host name")
        );
    }

    #[test]
    fn accepts_dns_names_and_ip_addresses() {
        assert!(parse_server_name("imap.example.com").is_ok());
        assert!(parse_server_name("127.0.0.1").is_ok());
        assert!(parse_server_name("").is_err());
    }

    #[tokio::test]
    async fn handshake_failure_is_reported() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            drop(stream);
        });

        let upgrader = Upgrader::with_roots(
            rustls::RootCertStore::empty(),
            parse_server_name("localhost").unwrap(),
        );
        let stream = tokio::net::TcpStream::connect(addr).await.unwrap();

        let error = upgrader.upgrade(stream).await.unwrap_err();
        assert!(matches!(error, ConnectError::Handshake(_)));

        server.await.unwrap();
    }
}
