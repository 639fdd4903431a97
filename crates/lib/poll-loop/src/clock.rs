//! Tick sources.

use std::time::Duration;

/// A source of evenly spaced ticks.
pub trait Clock {
    /// Wait for the next tick.
    ///
    /// Must be cancel safe: dropping the future before it completes must not
    /// lose or duplicate a tick.
    fn tick(&mut self) -> impl std::future::Future<Output = ()>;
}

/// Real-time clock backed by a tokio interval.
///
/// The first tick completes one period after creation. When a tick is
/// missed because the loop was busy, the schedule shifts instead of
/// bursting to catch up.
#[derive(Debug)]
pub struct IntervalClock {
    /// The underlying interval.
    interval: tokio::time::Interval,
}

impl IntervalClock {
    /// The default tick period.
    pub const ONE_SECOND: Duration = Duration::from_secs(1);

    /// Create a clock ticking every `period`.
    pub fn new(period: Duration) -> Self {
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        Self { interval }
    }

    /// Create a clock ticking once per second.
    pub fn every_second() -> Self {
        Self::new(Self::ONE_SECOND)
    }
}

impl Clock for IntervalClock {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
