//! Display cadence for live timers.
//!
//! The interval only exists while something is running; disarming drops it,
//! so a stopped view holds no timer at all.

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Arm while `running`, disarm otherwise. Must be called inside a runtime.
    pub fn sync(&mut self, running: bool) {
        match (running, self.interval.is_some()) {
            (true, false) => {
                let mut interval = tokio::time::interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                self.interval = Some(interval);
                tracing::debug!(period_ms = self.period.as_millis() as u64, "ticker armed");
            }
            (false, true) => {
                self.interval = None;
                tracing::debug!("ticker disarmed");
            }
            _ => {}
        }
    }

    pub fn disarm(&mut self) {
        self.sync(false);
    }

    /// Resolves on the next tick; never resolves while disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
