//! Periodic sampling tick

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Fires every `period`, starting one period after it is armed
///
/// Dropping the timer cancels it.
#[derive(Debug)]
pub struct TickTimer {
    interval: Interval,
}

impl TickTimer {
    pub fn start(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        // A stalled task must not produce a burst of catch-up samples
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    pub async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }
}

/// Next tick of an optional timer; never resolves when there is none
pub async fn next_tick(timer: &mut Option<TickTimer>) -> Instant {
    match timer {
        Some(timer) => timer.tick().await,
        None => std::future::pending().await,
    }
}
