//! The tick-driven polling state machine.

use std::num::NonZeroU64;
use std::time::Duration;

/// Title of every notification.
pub const DEFAULT_TITLE: &str = "IMAP Notify";

/// How long notifications stay on screen.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Ticks between evaluations when none is given.
pub const DEFAULT_DELAY: NonZeroU64 = match NonZeroU64::new(60) {
    Some(delay) => delay,
    None => unreachable!(),
};

/// Fixed settings of a poll loop.
#[derive(Debug, Clone)]
pub struct Params {
    /// Folders eligible for notification.
    pub watch_set: crate::WatchSet,

    /// Ticks between evaluations.
    pub delay: NonZeroU64,

    /// Per-folder line template.
    pub template: crate::FormatTemplate,

    /// Notification title.
    pub title: String,

    /// Application name reported with notifications.
    pub app_name: String,

    /// Notification display timeout.
    pub timeout: Duration,
}

impl Params {
    /// Params with the default delay, template, title and timeout.
    pub fn new(watch_set: crate::WatchSet, app_name: impl Into<String>) -> Self {
        Self {
            watch_set,
            delay: DEFAULT_DELAY,
            template: crate::FormatTemplate::default(),
            title: DEFAULT_TITLE.to_string(),
            app_name: app_name.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Errors that end the poll loop.
#[derive(Debug, thiserror::Error)]
pub enum Error<StatusError> {
    /// The status provider failed.
    #[error("status fetch failed: {0}")]
    Status(#[source] StatusError),
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Step {
    /// The tick did not reach the delay boundary.
    Waiting,

    /// The tick reached the delay boundary and a cycle ran.
    Evaluated(Cycle),
}

/// What an evaluation cycle did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Cycle {
    /// No watched folder reported recent mail; nothing was sent.
    Quiet,

    /// One notification was sent.
    Notified {
        /// Number of folder lines in the notification.
        lines: usize,
    },
}

/// Polls a status provider every `delay` clock ticks and reports watched
/// folders with recent mail through a notification sink.
///
/// Cycles are strictly sequential: the next tick is not awaited until the
/// current cycle's notification has been dispatched.
#[derive(Debug)]
pub struct PollLoop<Clock, Provider, Sink> {
    /// Tick source.
    clock: Clock,

    /// Folder status source.
    provider: Provider,

    /// Notification destination.
    sink: Sink,

    /// Fixed settings.
    params: Params,

    /// Ticks seen since the loop was created.
    ticks: u64,
}

impl<Clock, Provider, Sink> PollLoop<Clock, Provider, Sink>
where
    Clock: crate::Clock,
    Provider: status_core::StatusProvider,
    Sink: notify_sink::NotificationSink,
{
    /// Create a poll loop with a zeroed tick counter.
    pub fn new(clock: Clock, provider: Provider, sink: Sink, params: Params) -> Self {
        Self {
            clock,
            provider,
            sink,
            params,
            ticks: 0,
        }
    }

    /// Ticks seen so far.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run until `shutdown` resolves or a cycle fails.
    ///
    /// `shutdown` is only raced against the wait for the next tick; a cycle
    /// that has started always runs to completion.
    pub async fn run<Shutdown>(
        &mut self,
        shutdown: Shutdown,
    ) -> Result<(), Error<Provider::Error>>
    where
        Shutdown: std::future::Future<Output = ()>,
    {
        let mut shutdown = std::pin::pin!(shutdown);

        tracing::info!(
            delay_secs = self.params.delay.get(),
            watched = ?self.params.watch_set,
            "watching folders for new mail"
        );

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::info!(ticks = self.ticks, "shutdown requested");
                    return Ok(());
                }
                () = self.clock.tick() => {}
            }

            self.on_tick().await?;
        }
    }

    /// Wait for one tick and handle it.
    pub async fn step(&mut self) -> Result<Step, Error<Provider::Error>> {
        self.clock.tick().await;
        self.on_tick().await
    }

    /// Count a tick and run a cycle when it lands on the delay boundary.
    async fn on_tick(&mut self) -> Result<Step, Error<Provider::Error>> {
        self.ticks = self.ticks.wrapping_add(1);

        if self.ticks % self.params.delay.get() != 0 {
            return Ok(Step::Waiting);
        }

        self.run_cycle().await.map(Step::Evaluated)
    }

    /// Fetch statuses, select the lines to report and send at most one
    /// notification.
    pub async fn run_cycle(&mut self) -> Result<Cycle, Error<Provider::Error>> {
        tracing::debug!(ticks = self.ticks, "checking folder status");

        let records = self.provider.status().await.map_err(Error::Status)?;
        let lines = crate::select_lines(&records, &self.params.watch_set, &self.params.template);

        let Some(message) = crate::compose_body(&lines) else {
            tracing::debug!(folders = records.len(), "no new mail in watched folders");
            return Ok(Cycle::Quiet);
        };

        tracing::info!(
            folders = records.len(),
            lines = lines.len(),
            "new mail in watched folders"
        );

        self.sink
            .notify(notify_sink::Notification {
                title: self.params.title.clone(),
                message,
                app_name: self.params.app_name.clone(),
                timeout: self.params.timeout,
            })
            .await;

        Ok(Cycle::Notified { lines: lines.len() })
    }
}
