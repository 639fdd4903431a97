//! Command line surface and option validation.

use std::num::NonZeroU64;
use std::path::PathBuf;

/// Notify about new mail in IMAP folders.
///
/// Exits with status 1 on invalid arguments or startup failures.
#[derive(Debug, clap::Parser)]
#[command(name = "imap-notify", version)]
pub struct Cli {
    /// Delay (in seconds) between notifications [default: 60]
    #[arg(short, long, value_name = "DELAY")]
    pub delay: Option<String>,

    /// Configuration file [default: ~/.config/imap-cli]
    ///
    /// The file is YAML with the connection settings under an `imap:` key,
    /// e.g. `imap: {host: ..., username: ..., password: ...}`. INI-style
    /// files with an `[imap]` section are not read and must be converted.
    #[arg(short, long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Per-folder output format, e.g. "{recent:<3} new mails in {directory} ({count} total)"
    #[arg(short, long, value_name = "FMT")]
    pub format: Option<String>,

    /// Generate verbose messages
    #[arg(short, long)]
    pub verbose: bool,

    /// Folders to watch
    #[arg(required = true, value_name = "DIRECTORIES")]
    pub directories: Vec<String>,
}

/// The delay option is not a positive whole number of seconds.
#[derive(Debug, thiserror::Error)]
#[error("Wrong value for option \"delay\": {value:?} ({source})")]
pub struct DelayError {
    /// The rejected value.
    pub value: String,

    /// Why it was rejected.
    #[source]
    pub source: std::num::ParseIntError,
}

/// Errors in option values, detected before anything external is touched.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// Invalid delay.
    #[error(transparent)]
    Delay(#[from] DelayError),

    /// Invalid format template.
    #[error("Wrong value for option \"format\": {0}")]
    Format(#[from] poll_loop::TemplateError),
}

/// Validated poll settings.
#[derive(Debug)]
pub struct Options {
    /// Poll loop settings.
    pub params: poll_loop::Params,

    /// Explicit config file path, if any.
    pub config_file: Option<PathBuf>,
}

impl Options {
    /// Validate the command line options.
    pub fn from_cli(cli: Cli, app_name: &str) -> Result<Self, OptionsError> {
        let delay = match cli.delay.as_deref() {
            Some(value) => parse_delay(value)?,
            None => poll_loop::DEFAULT_DELAY,
        };

        let template = match cli.format.as_deref() {
            Some(format) => poll_loop::FormatTemplate::parse(format)?,
            None => poll_loop::FormatTemplate::default(),
        };

        let watch_set = cli.directories.into_iter().collect();

        Ok(Self {
            params: poll_loop::Params {
                delay,
                template,
                ..poll_loop::Params::new(watch_set, app_name)
            },
            config_file: cli.config_file,
        })
    }
}

/// Exit status for a command line that could not be turned into [`Cli`].
///
/// Help and version requests succeed; every usage error exits with 1.
pub fn usage_exit_status(error: &clap::Error) -> u8 {
    if error.use_stderr() { 1 } else { 0 }
}

/// Parse a delay in seconds; zero is rejected.
pub fn parse_delay(value: &str) -> Result<NonZeroU64, DelayError> {
    value.trim().parse().map_err(|source| DelayError {
        value: value.to_string(),
        source,
    })
}
