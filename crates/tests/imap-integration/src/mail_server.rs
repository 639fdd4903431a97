//! A throwaway GreenMail server with a single account.

use std::time::Duration;

use testcontainers::core::{IntoContainerPort as _, WaitFor};
use testcontainers::runners::AsyncRunner as _;
use testcontainers::{ContainerAsync, GenericImage, ImageExt as _};
use tokio::net::TcpStream;

/// How long to keep retrying the first login while the server warms up.
const LOGIN_DEADLINE: Duration = Duration::from_secs(15);

/// Pause between login attempts.
const LOGIN_RETRY_INTERVAL: Duration = Duration::from_millis(250);

/// Errors from the test mail server.
#[derive(Debug, thiserror::Error)]
pub enum MailServerError {
    /// The container could not be started or inspected.
    #[error("container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    /// Connecting or logging in failed.
    #[error("IMAP: {0}")]
    Imap(#[from] async_imap::error::Error),

    /// Network I/O failed.
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    /// The server sent no greeting.
    #[error("IMAP server sent no greeting")]
    MissingGreeting,

    /// The server did not accept a login before the deadline.
    #[error("no successful login within {LOGIN_DEADLINE:?}")]
    NotReady,
}

/// A running GreenMail container.
#[derive(Debug)]
pub struct MailServer {
    /// Keeps the container alive.
    _container: ContainerAsync<GenericImage>,

    /// Host the IMAP port is mapped to.
    host: String,

    /// Mapped IMAP port.
    port: u16,

    /// Account user.
    user: String,

    /// Account password.
    password: String,
}

impl MailServer {
    /// Start a server with one account.
    pub async fn start(user: &str, password: &str) -> Result<Self, MailServerError> {
        let container = GenericImage::new("greenmail/standalone", "latest")
            .with_exposed_port(crate::IMAP_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Starting GreenMail API server at"))
            .with_env_var("GREENMAIL_USERS", format!("{user}:{password}"))
            .start()
            .await?;

        let host = container.get_host().await?.to_string();
        let port = container.get_host_port_ipv4(crate::IMAP_PORT).await?;

        Ok(Self {
            _container: container,
            host,
            port,
            user: user.to_string(),
            password: password.to_string(),
        })
    }

    /// Log in over plaintext IMAP, retrying until the server accepts.
    pub async fn login(&self) -> Result<async_imap::Session<TcpStream>, MailServerError> {
        let deadline = tokio::time::Instant::now() + LOGIN_DEADLINE;

        loop {
            match self.try_login().await {
                Ok(session) => return Ok(session),
                Err(_) if tokio::time::Instant::now() < deadline => {
                    tokio::time::sleep(LOGIN_RETRY_INTERVAL).await;
                }
                Err(_) => return Err(MailServerError::NotReady),
            }
        }
    }

    /// A single login attempt.
    async fn try_login(&self) -> Result<async_imap::Session<TcpStream>, MailServerError> {
        let stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
        let mut client = async_imap::Client::new(stream);
        client
            .read_response()
            .await
            .ok_or(MailServerError::MissingGreeting)??;

        client
            .login(&self.user, &self.password)
            .await
            .map_err(|(err, _client)| MailServerError::Imap(err))
    }
}
