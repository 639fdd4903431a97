//! Connection configuration loading for imap-notify.
//!
//! The config file is a YAML mapping of named sections; each consumer picks
//! the section it understands and ignores the rest.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config_core::ImapConfig;

/// The section holding the IMAP connection settings.
pub const IMAP_SECTION: &str = "imap";

/// Environment variable overriding the config file path.
#[cfg(feature = "env")]
pub const CONFIG_PATH_ENV: &str = "IMAP_NOTIFY_CONFIG";

/// A payload annotated with the file it came from.
#[derive(Debug)]
pub struct Meta<T> {
    /// The actual payload.
    pub payload: T,

    /// The path.
    pub path: PathBuf,
}

/// Error returned while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// No configuration file found in any of the provided paths.
    #[error("no config file found in paths: {paths:?}")]
    NotFound {
        /// The paths that were tried.
        paths: Vec<PathBuf>,
    },

    /// Failed to read the configuration file from disk.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path to the configuration file.
        path: PathBuf,

        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Error returned while extracting a section from the config contents.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The contents are not a YAML mapping of sections.
    #[error("invalid YAML: {0}")]
    Yaml(#[source] serde_yaml_bw::Error),

    /// The requested section is absent.
    #[error("section \"{0}\" not found")]
    MissingSection(String),

    /// The requested section does not hold valid connection settings.
    #[error("invalid section \"{section}\": {source}")]
    Section {
        /// The section name.
        section: String,

        /// Underlying deserialization error.
        #[source]
        source: serde_yaml_bw::Error,
    },
}

/// Error returned while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Failed to read the configuration file.
    #[error(transparent)]
    Read(ReadError),

    /// Failed to parse the configuration contents.
    #[error("failed to load config file {path}: {source}")]
    Parse {
        /// Path to the configuration file.
        path: PathBuf,

        /// Underlying parse error.
        #[source]
        source: ParseError,
    },
}

/// Read the contents of the first existing file in the list of paths.
///
/// Missing files are skipped; any other I/O error stops the search.
pub async fn read<P>(paths: &[P]) -> Result<Meta<String>, ReadError>
where
    P: AsRef<Path>,
{
    for path in paths {
        let path_ref = path.as_ref();
        match tokio::fs::read_to_string(path_ref).await {
            Ok(contents) => {
                return Ok(Meta {
                    payload: contents,
                    path: path_ref.to_path_buf(),
                });
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path_ref.display(), "config file not found, trying next");
                continue;
            }
            Err(source) => {
                return Err(ReadError::Read {
                    path: path_ref.to_path_buf(),
                    source,
                });
            }
        }
    }

    Err(ReadError::NotFound {
        paths: paths.iter().map(|p| p.as_ref().to_path_buf()).collect(),
    })
}

/// Parse the given section of the YAML config contents.
pub fn parse_section(contents: &str, section: &str) -> Result<ImapConfig, ParseError> {
    let mut sections: HashMap<String, serde_yaml_bw::Value> =
        serde_yaml_bw::from_str(contents).map_err(ParseError::Yaml)?;

    let value = sections
        .remove(section)
        .ok_or_else(|| ParseError::MissingSection(section.to_string()))?;

    serde_yaml_bw::from_value(value).map_err(|source| ParseError::Section {
        section: section.to_string(),
        source,
    })
}

/// Load the given section from the first existing config file.
pub async fn load<P>(paths: &[P], section: &str) -> Result<Meta<ImapConfig>, LoadError>
where
    P: AsRef<Path>,
{
    let Meta { payload, path } = read(paths).await.map_err(LoadError::Read)?;
    match parse_section(&payload, section) {
        Ok(payload) => Ok(Meta { payload, path }),
        Err(source) => Err(LoadError::Parse { path, source }),
    }
}

/// Load the given section, resolving the config path from the explicit
/// value, then the environment, then the defaults.
#[cfg(feature = "env")]
pub async fn with_default_env_var(
    explicit: Option<PathBuf>,
    section: &str,
) -> Result<Meta<ImapConfig>, WithDefaultEnvVarError> {
    let explicit = match explicit {
        Some(path) => Some(path),
        None => envfury::maybe(CONFIG_PATH_ENV).map_err(WithDefaultEnvVarError::Env)?,
    };

    let paths: Vec<PathBuf> = config_paths::resolve(explicit).collect();
    let meta = load(&paths, section).await?;

    tracing::debug!(path = %meta.path.display(), section, "loaded connection config");

    Ok(meta)
}

/// Errors that can occur during configuration loading with env lookup.
#[cfg(feature = "env")]
#[derive(Debug, thiserror::Error)]
pub enum WithDefaultEnvVarError {
    /// Env variable reading error.
    #[error("config path env var read: {0}")]
    Env(#[source] envfury::Error<envfury::ValueError<<PathBuf as std::str::FromStr>::Err>>),

    /// Loading configuration error.
    #[error(transparent)]
    Load(#[from] LoadError),
}
