use chrono::{DateTime, Utc};
use serde::Serialize;

/// Key of a tracking record: one row per task per contributor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordKey {
    pub task_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeTrackingRecord {
    pub task_id: String,                    // ⇔ time_tracking.task_id
    pub user_id: String,                    // ⇔ time_tracking.user_id
    pub is_running: bool,                   // ⇔ time_tracking.is_running (0/1)
    pub started_at: Option<DateTime<Utc>>,  // ⇔ time_tracking.started_at (RFC 3339, NULL when stopped)
    pub total_seconds: i64,                 // ⇔ time_tracking.total_seconds (completed intervals only)
    pub paused_by_session: bool,            // ⇔ time_tracking.paused_by_session
    pub updated_at: DateTime<Utc>,          // ⇔ time_tracking.updated_at
}

impl TimeTrackingRecord {
    /// Fresh, stopped record for a contributor's first start.
    pub fn new(task_id: &str, user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            task_id: task_id.to_string(),
            user_id: user_id.to_string(),
            is_running: false,
            started_at: None,
            total_seconds: 0,
            paused_by_session: false,
            updated_at: now,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            task_id: self.task_id.clone(),
            user_id: self.user_id.clone(),
        }
    }

    /// `is_running` with a missing `started_at` cannot be displayed as running.
    pub fn is_malformed(&self) -> bool {
        self.is_running && self.started_at.is_none()
    }

    /// Start instant of the open interval, if there is a usable one.
    pub fn running_since(&self) -> Option<DateTime<Utc>> {
        if self.is_running { self.started_at } else { None }
    }
}
