//! Turning status records into a notification body.

/// The folders the user asked to be notified about.
///
/// Membership is exact, case-sensitive name equality.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct WatchSet {
    /// Folder names in the order given, without duplicates.
    directories: Vec<String>,
}

impl WatchSet {
    /// Check whether a folder is watched.
    pub fn contains(&self, directory: &str) -> bool {
        self.directories.iter().any(|watched| watched == directory)
    }

    /// Watched folder names, in the order given.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.directories.iter().map(String::as_str)
    }
}

impl<S> FromIterator<S> for WatchSet
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut directories: Vec<String> = Vec::new();
        for directory in iter {
            let directory = directory.into();
            if !directories.contains(&directory) {
                directories.push(directory);
            }
        }
        Self { directories }
    }
}

/// Render one line per record that is watched and reports recent mail,
/// keeping the records' order.
pub fn select_lines(
    records: &[status_core::StatusRecord],
    watch_set: &WatchSet,
    template: &crate::FormatTemplate,
) -> Vec<String> {
    records
        .iter()
        .filter(|record| watch_set.contains(&record.directory) && record.has_recent())
        .map(|record| template.render(record))
        .collect()
}

/// Join rendered lines into a notification body; `None` when there is
/// nothing to report.
pub fn compose_body(lines: &[String]) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    Some(lines.join("\n"))
}
