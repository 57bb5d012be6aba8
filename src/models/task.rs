use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: String,
    pub urgency: String,
    pub budget_seconds: Option<i64>, // NULL ⇒ no limit
    pub created_at: DateTime<Utc>,
}
