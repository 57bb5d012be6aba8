//! Fan-in of the per-contributor tracking records of one task.
//!
//! Records are disjoint by `(task_id, user_id)`, so there is nothing to
//! merge: the tally is a sum of independent live timers.

use crate::core::calculator::elapsed::{LiveTimer, Snapshot, Transition, elapsed_at};
use crate::core::feed::Change;
use crate::models::contributor::Directory;
use crate::models::tracking_record::{RecordKey, TimeTrackingRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub type RecordChange = Change<TimeTrackingRecord, RecordKey>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorShare {
    pub user_id: String,
    pub name: String,
    pub seconds: i64,
    pub is_running: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TallySummary {
    pub total_seconds: i64,
    pub any_running: bool,
}

/// One-shot aggregate over freshly fetched records.
pub fn aggregate(records: &[TimeTrackingRecord], now: DateTime<Utc>) -> TallySummary {
    records.iter().fold(
        TallySummary {
            total_seconds: 0,
            any_running: false,
        },
        |acc, r| TallySummary {
            total_seconds: acc.total_seconds + elapsed_at(&Snapshot::from(r), now),
            any_running: acc.any_running || r.running_since().is_some(),
        },
    )
}

/// Live aggregate of one task, kept current by applying changes.
#[derive(Debug, Clone)]
pub struct TaskTally {
    task_id: String,
    timers: BTreeMap<String, LiveTimer>,
}

impl TaskTally {
    pub fn new(task_id: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            timers: BTreeMap::new(),
        }
    }

    pub fn contributor_count(&self) -> usize {
        self.timers.len()
    }

    /// Apply an initial fetch. Records of other tasks are skipped.
    pub fn ingest(&mut self, records: &[TimeTrackingRecord], now: DateTime<Utc>) {
        for r in records {
            self.upsert(r, now);
        }
    }

    fn upsert(&mut self, record: &TimeTrackingRecord, now: DateTime<Utc>) -> Option<Transition> {
        if record.task_id != self.task_id {
            return None;
        }
        let timer = self.timers.entry(record.user_id.clone()).or_default();
        Some(timer.apply(&Snapshot::from(record), now))
    }

    /// Apply one change-feed event; returns the transition it caused, if any.
    pub fn apply(&mut self, change: &RecordChange, now: DateTime<Utc>) -> Option<Transition> {
        match change {
            Change::Insert(r) | Change::Update(r) => self.upsert(r, now),
            Change::Delete(key) => {
                if key.task_id != self.task_id {
                    return None;
                }
                self.timers.remove(&key.user_id).map(|_| Transition::Stopped)
            }
        }
    }

    pub fn total_at(&self, now: DateTime<Utc>) -> i64 {
        self.timers.values().map(|t| t.elapsed(now)).sum()
    }

    pub fn any_running(&self) -> bool {
        self.timers.values().any(LiveTimer::is_running)
    }

    pub fn summary(&self, now: DateTime<Utc>) -> TallySummary {
        TallySummary {
            total_seconds: self.total_at(now),
            any_running: self.any_running(),
        }
    }

    /// Per-contributor live values, largest first.
    pub fn breakdown(&self, directory: &Directory, now: DateTime<Utc>) -> Vec<ContributorShare> {
        let mut shares: Vec<ContributorShare> = self
            .timers
            .iter()
            .map(|(user_id, timer)| ContributorShare {
                user_id: user_id.clone(),
                name: directory.name_of(user_id).to_string(),
                seconds: timer.elapsed(now),
                is_running: timer.is_running(),
            })
            .collect();
        shares.sort_by(|a, b| b.seconds.cmp(&a.seconds).then(a.user_id.cmp(&b.user_id)));
        shares
    }
}
