use crate::core::options::default_options;
use crate::db::queries::ts_to_db;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result, params};

/// Ensure that the `log` table exists; migration bookkeeping lives there.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        params![ts_to_db(&Utc::now()), version, message],
    )?;
    Ok(())
}

fn create_core_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id              TEXT PRIMARY KEY,
            title           TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'todo',
            urgency         TEXT NOT NULL DEFAULT 'normal',
            budget_seconds  INTEGER,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS time_tracking (
            task_id        TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            user_id        TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            is_running     INTEGER NOT NULL DEFAULT 0 CHECK(is_running IN (0,1)),
            started_at     TEXT,
            total_seconds  INTEGER NOT NULL DEFAULT 0,
            updated_at     TEXT NOT NULL,
            PRIMARY KEY (task_id, user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_time_tracking_user ON time_tracking(user_id, is_running);

        CREATE TABLE IF NOT EXISTS work_sessions (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date         TEXT NOT NULL,
            is_active    INTEGER NOT NULL DEFAULT 1 CHECK(is_active IN (0,1)),
            is_paused    INTEGER NOT NULL DEFAULT 0 CHECK(is_paused IN (0,1)),
            login_time   TEXT NOT NULL,
            paused_at    TEXT,
            logout_time  TEXT,
            UNIQUE (user_id, date)
        );
        "#,
    )?;
    Ok(())
}

fn create_task_options(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS task_options (
            kind      TEXT NOT NULL CHECK(kind IN ('status','urgency')),
            value     TEXT NOT NULL,
            label     TEXT NOT NULL,
            color     TEXT NOT NULL DEFAULT 'white',
            position  INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (kind, value)
        );
        "#,
    )?;

    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO task_options (kind, value, label, color, position)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for o in default_options() {
        stmt.execute(params![
            o.kind.to_db_str(),
            o.value,
            o.label,
            o.color,
            o.position
        ])?;
    }
    Ok(())
}

fn add_paused_by_session(conn: &Connection) -> Result<()> {
    conn.execute(
        "ALTER TABLE time_tracking ADD COLUMN paused_by_session INTEGER NOT NULL DEFAULT 0;",
        [],
    )?;
    Ok(())
}

fn add_paused_seconds(conn: &Connection) -> Result<()> {
    conn.execute(
        "ALTER TABLE work_sessions ADD COLUMN paused_seconds INTEGER NOT NULL DEFAULT 0;",
        [],
    )?;
    Ok(())
}

type Step = fn(&Connection) -> Result<()>;

/// Ordered list of schema migrations: (version, description, step).
const MIGRATIONS: &[(&str, &str, Step)] = &[
    (
        "20260301_0001_create_core_tables",
        "Created users, tasks, time_tracking and work_sessions tables",
        create_core_tables,
    ),
    (
        "20260301_0002_create_task_options",
        "Created task_options table with default status/urgency options",
        create_task_options,
    ),
    (
        "20260512_0003_add_paused_by_session",
        "Added paused_by_session flag to time_tracking",
        add_paused_by_session,
    ),
    (
        "20260820_0004_add_paused_seconds",
        "Added paused_seconds to work_sessions",
        add_paused_seconds,
    ),
];

/// Versions known to this build, in application order.
pub fn known_versions() -> Vec<&'static str> {
    MIGRATIONS.iter().map(|(v, _, _)| *v).collect()
}

/// Public entry point: run all pending migrations.
/// Each step runs in its own transaction together with its bookkeeping row.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, message, step) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        let run = || -> Result<()> {
            conn.execute_batch("BEGIN;")?;
            step(conn)?;
            mark_applied(conn, version, message)?;
            conn.execute_batch("COMMIT;")
        };

        if let Err(e) = run() {
            let _ = conn.execute_batch("ROLLBACK;");
            return Err(AppError::Migration(format!("{version}: {e}")));
        }

        tracing::info!(version, "migration applied");
        success(format!("Migration applied: {} → {}", version, message));
        applied += 1;
    }

    Ok(applied)
}
