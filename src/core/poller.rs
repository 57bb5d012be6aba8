//! Change feed over the `time_tracking` table.
//!
//! SQLite has no push notifications, so the poller reloads a task's records
//! on every call and turns the difference with the previous load into
//! insert / update / delete changes.

use crate::core::calculator::aggregate::RecordChange;
use crate::core::feed::{Change, EventSource, Feed, Handler, Subscription};
use crate::db::queries::load_records_for_task;
use crate::errors::AppResult;
use crate::models::tracking_record::TimeTrackingRecord;
use rusqlite::Connection;
use std::collections::BTreeMap;

pub struct RecordPoller {
    task_id: String,
    known: BTreeMap<String, TimeTrackingRecord>,
    feed: Feed<RecordChange>,
}

impl RecordPoller {
    pub fn new(task_id: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            known: BTreeMap::new(),
            feed: Feed::new(),
        }
    }

    /// Compare a fresh load with the previous one and remember it.
    pub fn diff(&mut self, rows: Vec<TimeTrackingRecord>) -> Vec<RecordChange> {
        let mut changes = Vec::new();
        let mut current = BTreeMap::new();

        for row in rows.into_iter().filter(|r| r.task_id == self.task_id) {
            match self.known.get(&row.user_id) {
                None => changes.push(Change::Insert(row.clone())),
                Some(prev) if *prev != row => changes.push(Change::Update(row.clone())),
                Some(_) => {}
            }
            current.insert(row.user_id.clone(), row);
        }

        for (user_id, prev) in &self.known {
            if !current.contains_key(user_id) {
                changes.push(Change::Delete(prev.key()));
            }
        }

        self.known = current;
        changes
    }

    /// Load, diff and publish. Returns the number of changes delivered.
    pub fn poll_once(&mut self, conn: &Connection) -> AppResult<usize> {
        let rows = load_records_for_task(conn, &self.task_id)?;
        let changes = self.diff(rows);
        for change in &changes {
            self.feed.publish(change);
        }
        if !changes.is_empty() {
            tracing::debug!(task_id = %self.task_id, changes = changes.len(), "poll delivered changes");
        }
        Ok(changes.len())
    }
}

impl EventSource<RecordChange> for RecordPoller {
    fn subscribe(&self, handler: Handler<RecordChange>) -> Subscription {
        self.feed.subscribe(handler)
    }
}
