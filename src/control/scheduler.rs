//! Fixed-cadence tick source.

use tokio::time::{interval, Duration, Interval, MissedTickBehavior};

/// Default tick period in milliseconds (~125 Hz)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 8;

/// Wakes the loop once per period.
///
/// Ticks missed because a tick overran are skipped rather than delivered in
/// a burst, so the cooldown always counts real periods.
#[derive(Debug)]
pub struct Scheduler {
    interval: Interval,
    period: Duration,
}

impl Scheduler {
    /// Must be called from within a tokio runtime.
    pub fn new(period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval, period }
    }

    /// Scheduler from a period in milliseconds.
    pub fn from_millis(period_ms: u64) -> Self {
        Self::new(Duration::from_millis(period_ms))
    }

    /// Waits for the next tick. The first call returns immediately.
    pub async fn next(&mut self) {
        self.interval.tick().await;
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }
}
