//! Folder status query.

use async_imap::types::{Name, NameAttribute};
use futures::TryStreamExt as _;

/// The `STATUS` data items requested for every folder.
const STATUS_ITEMS: &str = "(MESSAGES RECENT UNSEEN)";

/// Errors returned while querying folder status.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// Listing folders failed.
    #[error("LIST error: {0}")]
    List(#[source] async_imap::error::Error),

    /// Querying a folder failed.
    #[error("STATUS error for folder \"{folder}\": {source}")]
    Status {
        /// The folder name as sent to the server.
        folder: String,

        /// Underlying IMAP error.
        #[source]
        source: async_imap::error::Error,
    },
}

/// List every selectable folder and query its status, in `LIST` order.
pub async fn fetch_status<S>(
    session: &mut async_imap::Session<S>,
) -> Result<Vec<status_core::StatusRecord>, StatusError>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
{
    let folders = list_folders(session).await?;

    let mut records = Vec::with_capacity(folders.len());
    for folder in folders {
        let mailbox = session
            .status(&folder, STATUS_ITEMS)
            .await
            .map_err(|source| StatusError::Status {
                folder: folder.clone(),
                source,
            })?;

        let directory = match crate::decode_mailbox_name(&folder) {
            Ok(decoded) => decoded,
            Err(error) => {
                tracing::debug!(imap_mailbox = %folder, %error, "keeping undecodable folder name as-is");
                folder
            }
        };

        let record = status_core::StatusRecord {
            directory,
            recent: mailbox.recent.to_string(),
            count: mailbox.exists.to_string(),
            unseen: mailbox.unseen.unwrap_or(0).to_string(),
        };
        tracing::trace!(?record, "folder status");
        records.push(record);
    }

    Ok(records)
}

/// Collect the raw names of all folders that can be queried.
async fn list_folders<S>(session: &mut async_imap::Session<S>) -> Result<Vec<String>, StatusError>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
{
    let names = session
        .list(Some(""), Some("*"))
        .await
        .map_err(StatusError::List)?;
    let mut names = std::pin::pin!(names);

    let mut folders = Vec::new();
    while let Some(name) = names.try_next().await.map_err(StatusError::List)? {
        if is_selectable(&name) {
            folders.push(name.name().to_owned());
        } else {
            tracing::trace!(imap_mailbox = %name.name(), "skipping non-selectable folder");
        }
    }

    Ok(folders)
}

/// Whether `STATUS` can be issued for the folder.
fn is_selectable(name: &Name) -> bool {
    !name.attributes().iter().any(|attribute| match attribute {
        NameAttribute::NoSelect => true,
        NameAttribute::Extension(extension) => extension.eq_ignore_ascii_case("\\NonExistent"),
        _ => false,
    })
}
