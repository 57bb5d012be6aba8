use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One work session per user per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkSession {
    pub id: i64,
    pub user_id: String,
    pub date: NaiveDate,                     // local calendar day of the login
    pub is_active: bool,
    pub is_paused: bool,
    pub login_time: DateTime<Utc>,
    pub paused_at: Option<DateTime<Utc>>,
    pub logout_time: Option<DateTime<Utc>>,
    pub paused_seconds: i64,                 // closed pauses only
}

impl WorkSession {
    /// Task timers may only accrue while this returns true.
    pub fn allows_tracking(&self) -> bool {
        self.is_active && !self.is_paused
    }

    /// Seconds of the pause currently open at `now` (zero if not paused).
    pub fn open_pause_seconds(&self, now: DateTime<Utc>) -> i64 {
        match (self.is_paused, self.paused_at) {
            (true, Some(p)) => (now - p).num_seconds().max(0),
            _ => 0,
        }
    }

    /// Worked time: session span minus every pause, never negative.
    pub fn worked_seconds(&self, now: DateTime<Utc>) -> i64 {
        let end = self.logout_time.unwrap_or(now);
        let span = (end - self.login_time).num_seconds();
        (span - self.paused_seconds - self.open_pause_seconds(now)).max(0)
    }

    pub fn state_label(&self) -> &'static str {
        match (self.is_active, self.is_paused) {
            (true, false) => "active",
            (true, true) => "paused",
            (false, _) => "closed",
        }
    }
}
