//! Task status / urgency options.
//!
//! An explicit store, built by the caller and handed to whoever needs it.
//! Subscribers are told which option kind changed on every `replace`.

use crate::core::feed::{EventSource, Feed, Handler, Subscription};
use crate::errors::{AppError, AppResult};
use crate::models::task_option::{OptionKind, TaskOption};

pub struct OptionStore {
    options: Vec<TaskOption>,
    changes: Feed<OptionKind>,
}

impl Default for OptionStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Options seeded into a fresh database.
pub fn default_options() -> Vec<TaskOption> {
    vec![
        TaskOption::new(OptionKind::Status, "todo", "To do", "white", 1),
        TaskOption::new(OptionKind::Status, "in_progress", "In progress", "blue", 2),
        TaskOption::new(OptionKind::Status, "review", "In review", "magenta", 3),
        TaskOption::new(OptionKind::Status, "done", "Done", "green", 4),
        TaskOption::new(OptionKind::Urgency, "low", "Low", "cyan", 1),
        TaskOption::new(OptionKind::Urgency, "normal", "Normal", "white", 2),
        TaskOption::new(OptionKind::Urgency, "high", "High", "yellow", 3),
        TaskOption::new(OptionKind::Urgency, "urgent", "Urgent", "red", 4),
    ]
}

fn of_kind(options: &[TaskOption], kind: OptionKind) -> Vec<&TaskOption> {
    options.iter().filter(|o| o.kind == kind).collect()
}

impl OptionStore {
    pub fn new(mut options: Vec<TaskOption>) -> Self {
        options.sort_by_key(|o| (o.kind.to_db_str(), o.position));
        Self {
            options,
            changes: Feed::new(),
        }
    }

    /// Swap the whole option set, notifying once per kind that changed.
    pub fn replace(&mut self, options: Vec<TaskOption>) {
        let mut next = options;
        next.sort_by_key(|o| (o.kind.to_db_str(), o.position));

        let changed: Vec<OptionKind> = [OptionKind::Status, OptionKind::Urgency]
            .into_iter()
            .filter(|k| of_kind(&self.options, *k) != of_kind(&next, *k))
            .collect();

        self.options = next;
        for kind in changed {
            self.changes.publish(&kind);
        }
    }

    pub fn values(&self, kind: OptionKind) -> Vec<&TaskOption> {
        of_kind(&self.options, kind)
    }

    pub fn get(&self, kind: OptionKind, value: &str) -> Option<&TaskOption> {
        self.options
            .iter()
            .find(|o| o.kind == kind && o.value == value)
    }

    pub fn contains(&self, kind: OptionKind, value: &str) -> bool {
        self.get(kind, value).is_some()
    }

    pub fn label_for(&self, kind: OptionKind, value: &str) -> Option<&str> {
        self.get(kind, value).map(|o| o.label.as_str())
    }

    /// First option of a kind, used when the caller gives none.
    pub fn first_value(&self, kind: OptionKind) -> Option<&str> {
        self.values(kind).first().map(|o| o.value.as_str())
    }

    pub fn validate(&self, kind: OptionKind, value: &str) -> AppResult<()> {
        if self.contains(kind, value) {
            Ok(())
        } else {
            Err(AppError::InvalidOption {
                kind: kind.to_string(),
                value: value.to_string(),
            })
        }
    }
}

impl EventSource<OptionKind> for OptionStore {
    fn subscribe(&self, handler: Handler<OptionKind>) -> Subscription {
        self.changes.subscribe(handler)
    }
}
