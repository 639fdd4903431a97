//! Authenticated IMAP session setup.

/// The effective session type we use.
pub type Session = async_imap::Session<imap_tls::TlsStream>;

/// IMAP session params.
#[derive(Clone, PartialEq)]
pub struct Params<'a> {
    /// Hostname or IP address of the IMAP server.
    pub host: &'a str,

    /// IMAP port.
    pub port: u16,

    /// TLS mode.
    pub tls_mode: imap_tls::TlsMode,

    /// TLS server name (SNI).
    pub tls_server_name: &'a str,

    /// Username for IMAP authentication.
    pub username: &'a str,

    /// Password for IMAP authentication.
    pub password: &'a str,
}

impl std::fmt::Debug for Params<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Params")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls_mode", &self.tls_mode)
            .field("tls_server_name", &self.tls_server_name)
            .field("username", &self.username)
            .field("password", &"***redacted***")
            .finish()
    }
}

/// Errors returned while establishing a session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// TCP connection error.
    #[error("TCP connection error: {0}")]
    TcpConnect(#[source] std::io::Error),

    /// TLS could not be prepared for the server.
    #[error("TLS setup: {0}")]
    TlsSetup(#[source] imap_tls::TlsSetupError),

    /// TLS or greeting error.
    #[error("connect: {0}")]
    Connect(#[source] imap_tls::ConnectError),

    /// IMAP login error.
    #[error("login: {0}")]
    Login(#[source] async_imap::error::Error),
}

/// Connect and login to establish an IMAP session.
pub async fn establish(params: Params<'_>) -> Result<Session, Error> {
    let Params {
        host,
        port,
        tls_mode,
        tls_server_name,
        username,
        password,
    } = params;

    tracing::debug!(
        imap_host = %host,
        imap_port = port,
        imap_tls_mode = ?tls_mode,
        tls_server_name = %tls_server_name,
        "connecting to an IMAP server"
    );

    let upgrader = imap_tls::Upgrader::new(tls_server_name).map_err(Error::TlsSetup)?;

    let tcp_stream = tokio::net::TcpStream::connect((host, port))
        .await
        .map_err(Error::TcpConnect)?;

    let client = imap_tls::connect(tcp_stream, &upgrader, tls_mode)
        .await
        .map_err(Error::Connect)?;

    let session = client
        .login(username, password)
        .await
        .map_err(|(err, _client)| Error::Login(err))?;

    tracing::debug!(imap_host = %host, imap_user = %username, "logged in");

    Ok(session)
}
