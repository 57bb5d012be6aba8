//! Work sessions: one per user per calendar day.
//!
//! Pausing or stopping a session also stops the user's running task timers;
//! timers stopped by a pause are flagged and restarted on resume.

use crate::core::timer::fold_open_interval;
use crate::db::log::ttlog;
use crate::db::queries::{
    get_active_session, get_session, get_user, insert_session, load_paused_by_session, load_running_for_user,
    update_session, upsert_record,
};
use crate::errors::{AppError, AppResult};
use crate::models::tracking_record::TimeTrackingRecord;
use crate::models::work_session::WorkSession;
use chrono::{DateTime, Local, NaiveDate, Utc};
use rusqlite::Connection;

/// Local calendar day a session started at `now` belongs to.
pub fn session_day(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Local).date_naive()
}

pub struct SessionLogic;

fn require_user(conn: &Connection, user_id: &str) -> AppResult<()> {
    match get_user(conn, user_id)? {
        Some(_) => Ok(()),
        None => Err(AppError::UnknownUser(user_id.to_string())),
    }
}

/// Open session of the user; one started before midnight still counts.
fn require_active(conn: &Connection, user_id: &str) -> AppResult<WorkSession> {
    get_active_session(conn, user_id)?.ok_or_else(|| AppError::SessionNotActive(user_id.to_string()))
}

/// Stop every running timer of the user; `flag` marks them for resume.
fn stop_running_timers(
    conn: &Connection,
    user_id: &str,
    now: DateTime<Utc>,
    flag: bool,
) -> AppResult<Vec<TimeTrackingRecord>> {
    let mut stopped = Vec::new();
    for mut rec in load_running_for_user(conn, user_id)? {
        fold_open_interval(&mut rec, now);
        rec.paused_by_session = flag;
        upsert_record(conn, &rec)?;
        stopped.push(rec);
    }
    Ok(stopped)
}

impl SessionLogic {
    /// The open session if there is one, else today's closed one.
    pub fn current(conn: &Connection, user_id: &str, now: DateTime<Utc>) -> AppResult<Option<WorkSession>> {
        match get_active_session(conn, user_id)? {
            Some(s) => Ok(Some(s)),
            None => get_session(conn, user_id, &session_day(now)),
        }
    }

    pub fn start(conn: &Connection, user_id: &str, now: DateTime<Utc>) -> AppResult<WorkSession> {
        require_user(conn, user_id)?;
        let day = session_day(now);

        // an open session from an earlier day has to be stopped first
        if get_active_session(conn, user_id)?.is_some() {
            return Err(AppError::SessionAlreadyActive(user_id.to_string()));
        }

        let session = match get_session(conn, user_id, &day)? {
            // Reopen today's closed session; the time away counts as a pause.
            Some(mut s) => {
                let away = s
                    .logout_time
                    .map(|out| (now - out).num_seconds().max(0))
                    .unwrap_or(0);
                s.paused_seconds += away;
                s.is_active = true;
                s.is_paused = false;
                s.paused_at = None;
                s.logout_time = None;
                update_session(conn, &s)?;
                ttlog(conn, "session_reopen", user_id, &format!("Session reopened after {}s away", away))?;
                s
            }
            None => {
                let mut s = WorkSession {
                    id: 0,
                    user_id: user_id.to_string(),
                    date: day,
                    is_active: true,
                    is_paused: false,
                    login_time: now,
                    paused_at: None,
                    logout_time: None,
                    paused_seconds: 0,
                };
                s.id = insert_session(conn, &s)?;
                ttlog(conn, "session_start", user_id, &format!("Session started for {}", day))?;
                s
            }
        };

        Ok(session)
    }

    pub fn pause(
        conn: &Connection,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<(WorkSession, Vec<TimeTrackingRecord>)> {
        let mut s = require_active(conn, user_id)?;
        if s.is_paused {
            return Err(AppError::SessionPaused(user_id.to_string()));
        }

        let tx = conn.unchecked_transaction()?;
        s.is_paused = true;
        s.paused_at = Some(now);
        update_session(&tx, &s)?;
        let stopped = stop_running_timers(&tx, user_id, now, true)?;
        ttlog(&tx, "session_pause", user_id, &format!("Session paused, {} timer(s) stopped", stopped.len()))?;
        tx.commit()?;

        Ok((s, stopped))
    }

    pub fn resume(
        conn: &Connection,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<(WorkSession, Vec<TimeTrackingRecord>)> {
        let mut s = require_active(conn, user_id)?;
        if !s.is_paused {
            return Err(AppError::SessionNotPaused(user_id.to_string()));
        }

        let tx = conn.unchecked_transaction()?;
        s.paused_seconds += s.open_pause_seconds(now);
        s.is_paused = false;
        s.paused_at = None;
        update_session(&tx, &s)?;

        let mut restarted = Vec::new();
        for mut rec in load_paused_by_session(&tx, user_id)? {
            rec.is_running = true;
            rec.started_at = Some(now);
            rec.paused_by_session = false;
            rec.updated_at = now;
            upsert_record(&tx, &rec)?;
            restarted.push(rec);
        }
        ttlog(&tx, "session_resume", user_id, &format!("Session resumed, {} timer(s) restarted", restarted.len()))?;
        tx.commit()?;

        Ok((s, restarted))
    }

    pub fn stop(
        conn: &Connection,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<(WorkSession, Vec<TimeTrackingRecord>)> {
        let mut s = require_active(conn, user_id)?;

        let tx = conn.unchecked_transaction()?;
        s.paused_seconds += s.open_pause_seconds(now);
        s.is_active = false;
        s.is_paused = false;
        s.paused_at = None;
        s.logout_time = Some(now);
        update_session(&tx, &s)?;

        let stopped = stop_running_timers(&tx, user_id, now, false)?;
        for mut rec in load_paused_by_session(&tx, user_id)? {
            rec.paused_by_session = false;
            rec.updated_at = now;
            upsert_record(&tx, &rec)?;
        }
        ttlog(
            &tx,
            "session_stop",
            user_id,
            &format!("Session closed after {}s worked", s.worked_seconds(now)),
        )?;
        tx.commit()?;

        Ok((s, stopped))
    }
}
