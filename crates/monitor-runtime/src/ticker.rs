//! Per-fact poll cadence.

use std::time::Duration;

use tokio::time::{self, Interval, MissedTickBehavior};

/// Periodic timer driving one poll loop.
///
/// The first tick completes immediately. A zero period never sleeps; each
/// tick only yields to the scheduler so other tasks keep running while the
/// loop polls back-to-back.
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        let interval = (!period.is_zero()).then(|| {
            let mut interval = time::interval(period);
            // A slow fetch pushes the schedule back instead of bursting.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        Self { period, interval }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next tick.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => tokio::task::yield_now().await,
        }
    }
}
