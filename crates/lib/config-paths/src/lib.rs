//! Default configuration file paths for imap-notify.

use std::path::{Path, PathBuf};

use either::Either;

/// Returns an iterator over default configuration file paths.
///
/// The paths are yielded in order of preference:
/// 1. `imap-cli` in the user config directory (`~/.config/imap-cli` on Linux)
/// 2. The same with a `.yaml` extension
/// 3. `~/.imap-cli` in the home directory
pub fn defaults() -> impl Iterator<Item = PathBuf> {
    let config_path = dirs::config_dir()
        .into_iter()
        .flat_map(|d| [d.join("imap-cli"), d.join("imap-cli.yaml")]);
    let home_path = dirs::home_dir()
        .into_iter()
        .map(|d| d.join(".imap-cli"));

    config_path.chain(home_path)
}

/// Resolves candidate configuration paths.
///
/// An explicitly provided path (from the command line or the environment)
/// is the only candidate; otherwise the defaults are used.
pub fn resolve(explicit: Option<PathBuf>) -> impl Iterator<Item = PathBuf> {
    match explicit {
        Some(path) => Either::Left(std::iter::once(expand_home(&path))),
        None => Either::Right(defaults()),
    }
}

/// Expand a leading `~` component to the user's home directory.
///
/// Paths without a leading `~`, or when the home directory is unknown,
/// are returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
