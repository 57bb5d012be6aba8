use crate::errors::{AppError, AppResult};
use crate::models::contributor::Contributor;
use crate::models::task::Task;
use crate::models::task_option::{OptionKind, TaskOption};
use crate::models::tracking_record::TimeTrackingRecord;
use crate::models::work_session::WorkSession;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

// ------------------------------------------------
// Column conversions
// ------------------------------------------------

pub fn ts_to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| conversion_error(0, AppError::InvalidTimestamp(raw.to_string())))
}

fn get_ts(row: &Row, col: &str) -> Result<DateTime<Utc>> {
    let raw: String = row.get(col)?;
    parse_ts(&raw)
}

fn get_opt_ts(row: &Row, col: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(col)?;
    raw.as_deref().map(parse_ts).transpose()
}

fn get_flag(row: &Row, col: &str) -> Result<bool> {
    Ok(row.get::<_, i32>(col)? == 1)
}

// ------------------------------------------------
// Users
// ------------------------------------------------

pub fn insert_user(conn: &Connection, id: &str, name: &str, now: DateTime<Utc>) -> AppResult<()> {
    if get_user(conn, id)?.is_some() {
        return Err(AppError::Duplicate(format!("user '{}'", id)));
    }
    conn.execute(
        "INSERT INTO users (id, name, created_at) VALUES (?1, ?2, ?3)",
        params![id, name, ts_to_db(&now)],
    )?;
    Ok(())
}

fn map_user(row: &Row) -> Result<Contributor> {
    Ok(Contributor {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

pub fn get_user(conn: &Connection, id: &str) -> AppResult<Option<Contributor>> {
    let user = conn
        .query_row("SELECT id, name FROM users WHERE id = ?1", [id], map_user)
        .optional()?;
    Ok(user)
}

pub fn list_users(conn: &Connection) -> AppResult<Vec<Contributor>> {
    let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_user)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ------------------------------------------------
// Tasks
// ------------------------------------------------

fn map_task(row: &Row) -> Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        status: row.get("status")?,
        urgency: row.get("urgency")?,
        budget_seconds: row.get("budget_seconds")?,
        created_at: get_ts(row, "created_at")?,
    })
}

pub fn insert_task(conn: &Connection, task: &Task) -> AppResult<()> {
    if get_task(conn, &task.id)?.is_some() {
        return Err(AppError::Duplicate(format!("task '{}'", task.id)));
    }
    conn.execute(
        "INSERT INTO tasks (id, title, status, urgency, budget_seconds, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            task.id,
            task.title,
            task.status,
            task.urgency,
            task.budget_seconds,
            ts_to_db(&task.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_task(conn: &Connection, id: &str) -> AppResult<Option<Task>> {
    let task = conn
        .query_row("SELECT * FROM tasks WHERE id = ?1", [id], map_task)
        .optional()?;
    Ok(task)
}

pub fn list_tasks(conn: &Connection) -> AppResult<Vec<Task>> {
    let mut stmt = conn.prepare("SELECT * FROM tasks ORDER BY created_at ASC, id ASC")?;
    let rows = stmt.query_map([], map_task)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn set_task_budget(conn: &Connection, id: &str, budget_seconds: Option<i64>) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE tasks SET budget_seconds = ?1 WHERE id = ?2",
        params![budget_seconds, id],
    )?;
    if n == 0 {
        return Err(AppError::UnknownTask(id.to_string()));
    }
    Ok(())
}

// ------------------------------------------------
// Task options
// ------------------------------------------------

pub fn load_options(conn: &Connection) -> AppResult<Vec<TaskOption>> {
    let mut stmt = conn.prepare(
        "SELECT kind, value, label, color, position FROM task_options
         ORDER BY kind ASC, position ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        let kind_str: String = row.get("kind")?;
        let kind = OptionKind::from_db_str(&kind_str).ok_or_else(|| {
            conversion_error(
                0,
                AppError::InvalidOption {
                    kind: "kind".into(),
                    value: kind_str.clone(),
                },
            )
        })?;
        Ok(TaskOption {
            kind,
            value: row.get("value")?,
            label: row.get("label")?,
            color: row.get("color")?,
            position: row.get("position")?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ------------------------------------------------
// Time tracking records
// ------------------------------------------------

pub fn map_record(row: &Row) -> Result<TimeTrackingRecord> {
    Ok(TimeTrackingRecord {
        task_id: row.get("task_id")?,
        user_id: row.get("user_id")?,
        is_running: get_flag(row, "is_running")?,
        started_at: get_opt_ts(row, "started_at")?,
        total_seconds: row.get("total_seconds")?,
        paused_by_session: get_flag(row, "paused_by_session")?,
        updated_at: get_ts(row, "updated_at")?,
    })
}

fn collect_records(conn: &Connection, sql: &str, arg: &str) -> AppResult<Vec<TimeTrackingRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([arg], map_record)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_record(conn: &Connection, task_id: &str, user_id: &str) -> AppResult<Option<TimeTrackingRecord>> {
    let rec = conn
        .query_row(
            "SELECT * FROM time_tracking WHERE task_id = ?1 AND user_id = ?2",
            params![task_id, user_id],
            map_record,
        )
        .optional()?;
    Ok(rec)
}

pub fn load_records_for_task(conn: &Connection, task_id: &str) -> AppResult<Vec<TimeTrackingRecord>> {
    collect_records(
        conn,
        "SELECT * FROM time_tracking WHERE task_id = ?1 ORDER BY user_id ASC",
        task_id,
    )
}

pub fn load_running_for_user(conn: &Connection, user_id: &str) -> AppResult<Vec<TimeTrackingRecord>> {
    collect_records(
        conn,
        "SELECT * FROM time_tracking WHERE user_id = ?1 AND is_running = 1 ORDER BY task_id ASC",
        user_id,
    )
}

pub fn load_paused_by_session(conn: &Connection, user_id: &str) -> AppResult<Vec<TimeTrackingRecord>> {
    collect_records(
        conn,
        "SELECT * FROM time_tracking WHERE user_id = ?1 AND paused_by_session = 1 ORDER BY task_id ASC",
        user_id,
    )
}

pub fn upsert_record(conn: &Connection, rec: &TimeTrackingRecord) -> AppResult<()> {
    conn.execute(
        "INSERT INTO time_tracking
            (task_id, user_id, is_running, started_at, total_seconds, paused_by_session, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(task_id, user_id) DO UPDATE SET
            is_running = excluded.is_running,
            started_at = excluded.started_at,
            total_seconds = excluded.total_seconds,
            paused_by_session = excluded.paused_by_session,
            updated_at = excluded.updated_at",
        params![
            rec.task_id,
            rec.user_id,
            if rec.is_running { 1 } else { 0 },
            rec.started_at.as_ref().map(ts_to_db),
            rec.total_seconds,
            if rec.paused_by_session { 1 } else { 0 },
            ts_to_db(&rec.updated_at),
        ],
    )?;
    Ok(())
}

// ------------------------------------------------
// Work sessions
// ------------------------------------------------

fn map_session(row: &Row) -> Result<WorkSession> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(0, AppError::InvalidTimestamp(date_str.clone())))?;

    Ok(WorkSession {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        date,
        is_active: get_flag(row, "is_active")?,
        is_paused: get_flag(row, "is_paused")?,
        login_time: get_ts(row, "login_time")?,
        paused_at: get_opt_ts(row, "paused_at")?,
        logout_time: get_opt_ts(row, "logout_time")?,
        paused_seconds: row.get("paused_seconds")?,
    })
}

pub fn get_session(conn: &Connection, user_id: &str, date: &NaiveDate) -> AppResult<Option<WorkSession>> {
    let s = conn
        .query_row(
            "SELECT * FROM work_sessions WHERE user_id = ?1 AND date = ?2",
            params![user_id, date.format("%Y-%m-%d").to_string()],
            map_session,
        )
        .optional()?;
    Ok(s)
}

/// The user's open session, whatever day it started on.
pub fn get_active_session(conn: &Connection, user_id: &str) -> AppResult<Option<WorkSession>> {
    let s = conn
        .query_row(
            "SELECT * FROM work_sessions WHERE user_id = ?1 AND is_active = 1
             ORDER BY date DESC LIMIT 1",
            [user_id],
            map_session,
        )
        .optional()?;
    Ok(s)
}

pub fn insert_session(conn: &Connection, s: &WorkSession) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO work_sessions
            (user_id, date, is_active, is_paused, login_time, paused_at, logout_time, paused_seconds)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            s.user_id,
            s.date.format("%Y-%m-%d").to_string(),
            if s.is_active { 1 } else { 0 },
            if s.is_paused { 1 } else { 0 },
            ts_to_db(&s.login_time),
            s.paused_at.as_ref().map(ts_to_db),
            s.logout_time.as_ref().map(ts_to_db),
            s.paused_seconds,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_session(conn: &Connection, s: &WorkSession) -> AppResult<()> {
    conn.execute(
        "UPDATE work_sessions SET
            is_active = ?1,
            is_paused = ?2,
            paused_at = ?3,
            logout_time = ?4,
            paused_seconds = ?5
         WHERE id = ?6",
        params![
            if s.is_active { 1 } else { 0 },
            if s.is_paused { 1 } else { 0 },
            s.paused_at.as_ref().map(ts_to_db),
            s.logout_time.as_ref().map(ts_to_db),
            s.paused_seconds,
            s.id,
        ],
    )?;
    Ok(())
}
