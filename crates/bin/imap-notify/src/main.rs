//! Raise desktop notifications for new mail in watched IMAP folders.

use std::process::ExitCode;

use clap::Parser as _;
use color_eyre::eyre::WrapErr as _;

mod cli;

/// Name reported with every notification.
const APP_NAME: &str = env!("CARGO_BIN_NAME");

/// Failures that stop the process before polling starts.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    /// Invalid command line option.
    #[error(transparent)]
    Options(#[from] cli::OptionsError),

    /// Notifications cannot be shown.
    #[error(transparent)]
    Capability(#[from] notify_sink::MissingCapabilityError),

    /// Connection config could not be loaded.
    #[error("connection config: {0}")]
    Config(#[from] config_load::WithDefaultEnvVarError),
}

/// Everything needed to connect and start polling.
struct Startup {
    /// Poll loop settings.
    params: poll_loop::Params,

    /// Notification sink.
    sink: notify_sink::DesktopSink,

    /// Connection settings.
    imap: config_core::ImapConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::eyre::Result<ExitCode> {
    color_eyre::install()?;

    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            error.print()?;
            return Ok(ExitCode::from(cli::usage_exit_status(&error)));
        }
    };
    init_tracing(cli.verbose);

    let Startup { params, sink, imap } = match startup(cli).await {
        Ok(startup) => startup,
        Err(error) => return Ok(startup_failed(&error)),
    };

    let session = imap_session::establish(imap_session::Params {
        host: &imap.host,
        port: imap.effective_port(),
        tls_mode: map_tls_mode(imap.tls.mode),
        tls_server_name: imap.effective_tls_server_name(),
        username: &imap.username,
        password: &imap.password,
    })
    .await
    .wrap_err_with(|| format!("failed to connect to {}", imap.host))?;
    drop(imap);

    let provider = imap_status::ImapStatusProvider::new(session);
    let mut poll = poll_loop::PollLoop::new(
        poll_loop::IntervalClock::every_second(),
        provider,
        sink,
        params,
    );

    poll.run(shutdown_signal())
        .await
        .wrap_err("checking for new mail failed")?;

    Ok(ExitCode::SUCCESS)
}

/// Validate options, check the notification capability and load the
/// connection config, in that order.
async fn startup(cli: cli::Cli) -> Result<Startup, StartupError> {
    let cli::Options {
        params,
        config_file,
    } = cli::Options::from_cli(cli, APP_NAME)?;

    let sink = notify_sink::check_capability()?;
    if let Some(server) = &sink.server {
        tracing::debug!(notification_server = %server, "notifications available");
    }

    let imap = config_load::with_default_env_var(config_file, config_load::IMAP_SECTION)
        .await?
        .payload;

    Ok(Startup { params, sink, imap })
}

/// Report a startup failure; the process exits with status 1.
fn startup_failed(error: &StartupError) -> ExitCode {
    tracing::error!("{error}");
    ExitCode::FAILURE
}

/// Log to stdout: debug level when verbose, warnings otherwise.
/// `RUST_LOG` takes precedence when set.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        tracing_subscriber::filter::LevelFilter::WARN
    };

    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .init();
}

/// Convert config TLS mode to IMAP TLS mode.
fn map_tls_mode(mode: config_core::TlsMode) -> imap_tls::TlsMode {
    match mode {
        config_core::TlsMode::Implicit => imap_tls::TlsMode::Implicit,
        config_core::TlsMode::StartTls => imap_tls::TlsMode::StartTls,
    }
}

/// Resolve on Ctrl-C.
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "unable to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
