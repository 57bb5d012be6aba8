//! Live elapsed time of a tracking record.
//!
//! A record only persists the seconds of its *completed* intervals plus the
//! start of the open one. The live value is derived locally:
//!
//! ```text
//! elapsed(now) = total + max(0, now - started_at)   while running
//! elapsed(now) = total                               while stopped
//! ```
//!
//! [`LiveTimer`] is the per-view state machine on top of that formula. It
//! anchors on the local clock when the record starts running so that later
//! re-deliveries of a slightly different `started_at` do not make the display
//! jump, and stops ticking as soon as a stopped snapshot arrives.

use crate::models::tracking_record::TimeTrackingRecord;
use chrono::{DateTime, Utc};

/// The part of a tracking record the calculator cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub total_seconds: i64,
    pub is_running: bool,
    pub started_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn stopped(total_seconds: i64) -> Self {
        Self {
            total_seconds,
            is_running: false,
            started_at: None,
        }
    }

    pub fn running(total_seconds: i64, started_at: DateTime<Utc>) -> Self {
        Self {
            total_seconds,
            is_running: true,
            started_at: Some(started_at),
        }
    }

    /// Start of the open interval; `None` when stopped or malformed.
    fn running_since(&self) -> Option<DateTime<Utc>> {
        if self.is_running { self.started_at } else { None }
    }

    fn baseline(&self) -> i64 {
        self.total_seconds.max(0)
    }
}

impl From<&TimeTrackingRecord> for Snapshot {
    fn from(r: &TimeTrackingRecord) -> Self {
        Self {
            total_seconds: r.total_seconds,
            is_running: r.is_running,
            started_at: r.started_at,
        }
    }
}

/// Milliseconds from `from` to `to`, clamped at zero (clock skew).
fn delta_ms(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().max(0)
}

/// Stateless live value of a snapshot at `now`.
pub fn elapsed_at(snapshot: &Snapshot, now: DateTime<Utc>) -> i64 {
    match snapshot.running_since() {
        Some(start) => snapshot.baseline() + delta_ms(start, now) / 1000,
        None => snapshot.baseline(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Stopped {
        display: i64,
    },
    Running {
        total: i64,
        /// Open-interval time already elapsed when the anchor was taken.
        lead_ms: i64,
        anchor: DateTime<Utc>,
    },
}

/// What an applied snapshot did to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Refreshed,
    Started,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveTimer {
    phase: Phase,
}

impl Default for LiveTimer {
    fn default() -> Self {
        Self::new()
    }
}

fn running_phase(total: i64, start: DateTime<Utc>, now: DateTime<Utc>) -> Phase {
    Phase::Running {
        total,
        lead_ms: delta_ms(start, now),
        anchor: now,
    }
}

impl LiveTimer {
    pub fn new() -> Self {
        Self {
            phase: Phase::Stopped { display: 0 },
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot, now: DateTime<Utc>) -> Self {
        let mut timer = Self::new();
        timer.apply(snapshot, now);
        timer
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Local anchor of the current running phase.
    pub fn anchor(&self) -> Option<DateTime<Utc>> {
        match self.phase {
            Phase::Running { anchor, .. } => Some(anchor),
            Phase::Stopped { .. } => None,
        }
    }

    /// Live value at `now`, in whole seconds.
    pub fn elapsed(&self, now: DateTime<Utc>) -> i64 {
        match self.phase {
            Phase::Stopped { display } => display,
            Phase::Running {
                total,
                lead_ms,
                anchor,
            } => total + (lead_ms + delta_ms(anchor, now)) / 1000,
        }
    }

    /// Feed a new upstream snapshot. Later snapshots always win.
    ///
    /// A running re-delivery with the same total keeps the anchor, so a
    /// slightly different `started_at` does not move the display. A new total
    /// while running means an interval was folded and a new one opened between
    /// two deliveries: the timer re-anchors on the new `started_at`.
    ///
    /// Stopping freezes the display on the stopping snapshot's total. Intervals
    /// are folded in the same write that clears `is_running`, so that total is
    /// already authoritative.
    pub fn apply(&mut self, snapshot: &Snapshot, now: DateTime<Utc>) -> Transition {
        if snapshot.is_running && snapshot.started_at.is_none() {
            tracing::warn!(
                total = snapshot.total_seconds,
                "running snapshot without start time, showing it as stopped"
            );
        }

        let total = snapshot.baseline();

        let (next, transition) = match (self.phase, snapshot.running_since()) {
            (Phase::Stopped { .. }, Some(start)) => (running_phase(total, start, now), Transition::Started),
            (Phase::Running { total: old, .. }, Some(start)) => {
                if old == total {
                    (self.phase, Transition::Unchanged)
                } else {
                    (running_phase(total, start, now), Transition::Refreshed)
                }
            }
            (Phase::Running { .. }, None) => (Phase::Stopped { display: total }, Transition::Stopped),
            (Phase::Stopped { display }, None) => {
                if display == total {
                    (self.phase, Transition::Unchanged)
                } else {
                    (Phase::Stopped { display: total }, Transition::Refreshed)
                }
            }
        };

        if matches!(transition, Transition::Started | Transition::Stopped) {
            tracing::debug!(?transition, total, "timer transition");
        }

        self.phase = next;
        transition
    }
}
