#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, TimeZone, Utc};
use hivetime::db::initialize::init_db;
use hivetime::db::pool::DbPool;
use hivetime::db::queries::{insert_task, insert_user};
use hivetime::models::task::Task;
use hivetime::models::tracking_record::TimeTrackingRecord;
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

/// Binary under test, isolated from the real home directory.
pub fn hv(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("hivetime");
    cmd.env("HIVETIME_HOME", home.path());
    cmd.env("USER", "alice");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Fresh temp home plus the path of a database inside it.
pub fn setup_home() -> (TempDir, String) {
    let home = tempfile::tempdir().expect("tempdir");
    let db: PathBuf = home.path().join("test.sqlite");
    (home, db.to_string_lossy().to_string())
}

/// `init` in test mode (no config file written).
pub fn init_cli(home: &TempDir, db: &str) {
    hv(home).args(["--db", db, "--test", "init"]).assert().success();
}

/// Fixed instant, `secs` seconds after 2026-03-10 10:00:00 UTC.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap() + chrono::Duration::seconds(secs)
}

/// In-memory database with schema, two users and one task.
pub fn memory_db() -> Connection {
    let conn = DbPool::in_memory().expect("open in-memory db").conn;
    init_db(&conn).expect("init db");
    insert_user(&conn, "alice", "Alice Liddell", at(0)).expect("user alice");
    insert_user(&conn, "bob", "Bob Stone", at(0)).expect("user bob");
    insert_task(&conn, &task("T-1", Some(3600))).expect("task");
    conn
}

pub fn task(id: &str, budget_seconds: Option<i64>) -> Task {
    Task {
        id: id.to_string(),
        title: format!("Task {id}"),
        status: "todo".into(),
        urgency: "normal".into(),
        budget_seconds,
        created_at: at(0),
    }
}

pub fn stopped(task_id: &str, user_id: &str, total: i64) -> TimeTrackingRecord {
    TimeTrackingRecord {
        total_seconds: total,
        ..TimeTrackingRecord::new(task_id, user_id, at(0))
    }
}

pub fn running(task_id: &str, user_id: &str, total: i64, started_at: DateTime<Utc>) -> TimeTrackingRecord {
    TimeTrackingRecord {
        is_running: true,
        started_at: Some(started_at),
        total_seconds: total,
        ..TimeTrackingRecord::new(task_id, user_id, at(0))
    }
}
