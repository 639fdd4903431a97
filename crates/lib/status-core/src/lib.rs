//! Folder status records and the provider interface.

/// The `recent` value a provider reports for a folder without new mail.
pub const NO_RECENT: &str = "0";

/// Status of a single folder at the time of a poll.
///
/// Counts are carried as decimal text; providers normalize whatever their
/// backend reports into this form.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StatusRecord {
    /// Folder name.
    pub directory: String,

    /// Messages that arrived since the last server-side check.
    pub recent: String,

    /// Total messages in the folder.
    pub count: String,

    /// Messages without the `\Seen` flag.
    pub unseen: String,
}

impl StatusRecord {
    /// Whether the provider reported new mail for this folder.
    ///
    /// Only the exact text `"0"` means "nothing new".
    pub fn has_recent(&self) -> bool {
        self.recent != NO_RECENT
    }
}

/// A source of folder status records.
pub trait StatusProvider {
    /// An error that a status query may fail with.
    type Error;

    /// Query the status of every known folder.
    ///
    /// Each call re-enumerates all folders from scratch; the order of the
    /// returned records is the order they should be reported in.
    fn status(
        &mut self,
    ) -> impl std::future::Future<Output = Result<Vec<StatusRecord>, Self::Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(recent: &str) -> StatusRecord {
        StatusRecord {
            directory: "INBOX".to_string(),
            recent: recent.to_string(),
            count: "50".to_string(),
            unseen: "2".to_string(),
        }
    }

    #[test]
    fn only_literal_zero_means_no_recent() {
        assert!(!record("0").has_recent());
        assert!(record("3").has_recent());
        assert!(record("00").has_recent());
        assert!(record("").has_recent());
        assert!(record("n/a").has_recent());
    }
}
