//! Start / stop of a contributor's timer on a task.

use crate::db::log::ttlog;
use crate::db::queries::{get_active_session, get_record, get_task, get_user, upsert_record};
use crate::errors::{AppError, AppResult};
use crate::models::tracking_record::TimeTrackingRecord;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

pub struct TimerLogic;

/// Close the open interval of `rec` into `total_seconds`.
/// Returns the seconds added (zero for a malformed running record).
pub fn fold_open_interval(rec: &mut TimeTrackingRecord, now: DateTime<Utc>) -> i64 {
    let added = rec
        .running_since()
        .map(|start| (now - start).num_seconds().max(0))
        .unwrap_or(0);

    rec.total_seconds += added;
    rec.is_running = false;
    rec.started_at = None;
    rec.updated_at = now;
    added
}

fn ensure_tracking_allowed(conn: &Connection, user_id: &str) -> AppResult<()> {
    match get_active_session(conn, user_id)? {
        Some(s) if s.allows_tracking() => Ok(()),
        Some(_) => Err(AppError::SessionPaused(user_id.to_string())),
        None => Err(AppError::SessionNotActive(user_id.to_string())),
    }
}

impl TimerLogic {
    pub fn start(
        conn: &Connection,
        task_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
        require_session: bool,
    ) -> AppResult<TimeTrackingRecord> {
        if get_task(conn, task_id)?.is_none() {
            return Err(AppError::UnknownTask(task_id.to_string()));
        }
        if get_user(conn, user_id)?.is_none() {
            return Err(AppError::UnknownUser(user_id.to_string()));
        }
        if require_session {
            ensure_tracking_allowed(conn, user_id)?;
        }

        let mut rec = get_record(conn, task_id, user_id)?
            .unwrap_or_else(|| TimeTrackingRecord::new(task_id, user_id, now));

        if rec.running_since().is_some() {
            return Err(AppError::TimerAlreadyRunning {
                task: task_id.to_string(),
                user: user_id.to_string(),
            });
        }

        rec.is_running = true;
        rec.started_at = Some(now);
        rec.paused_by_session = false;
        rec.updated_at = now;
        upsert_record(conn, &rec)?;

        ttlog(conn, "timer_start", task_id, &format!("{} started tracking", user_id))?;
        Ok(rec)
    }

    pub fn stop(
        conn: &Connection,
        task_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<TimeTrackingRecord> {
        let mut rec = match get_record(conn, task_id, user_id)? {
            Some(r) if r.is_running => r,
            _ => {
                return Err(AppError::TimerNotRunning {
                    task: task_id.to_string(),
                    user: user_id.to_string(),
                });
            }
        };

        if rec.is_malformed() {
            tracing::warn!(task_id, user_id, "running record without start time, closing it with no time added");
        }

        let added = fold_open_interval(&mut rec, now);
        upsert_record(conn, &rec)?;

        ttlog(
            conn,
            "timer_stop",
            task_id,
            &format!("{} stopped tracking (+{}s, total {}s)", user_id, added, rec.total_seconds),
        )?;
        Ok(rec)
    }
}
