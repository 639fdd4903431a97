//! Status provider over an authenticated session.

/// Folder status provider backed by an authenticated IMAP session.
#[derive(Debug)]
pub struct ImapStatusProvider<S>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
{
    /// The session all status queries run on.
    session: async_imap::Session<S>,
}

impl<S> ImapStatusProvider<S>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
{
    /// Wrap an authenticated session.
    pub fn new(session: async_imap::Session<S>) -> Self {
        Self { session }
    }

    /// Take back the underlying session.
    pub fn into_inner(self) -> async_imap::Session<S> {
        self.session
    }
}

impl<S> status_core::StatusProvider for ImapStatusProvider<S>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
{
    type Error = crate::StatusError;

    async fn status(&mut self) -> Result<Vec<status_core::StatusRecord>, Self::Error> {
        crate::fetch_status(&mut self.session).await
    }
}
