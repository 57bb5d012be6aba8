use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{hv, init_cli, setup_home};

/// Initialized home with alice and bob, task T-1 (1h budget) and T-2 (no budget).
fn seeded() -> (tempfile::TempDir, String) {
    let (home, db) = setup_home();
    init_cli(&home, &db);
    hv(&home).args(["--db", &db, "user", "add", "alice", "Alice Liddell"]).assert().success();
    hv(&home).args(["--db", &db, "user", "add", "bob", "Bob Stone"]).assert().success();
    hv(&home)
        .args(["--db", &db, "task", "add", "T-1", "Write report", "--budget", "1h"])
        .assert()
        .success();
    hv(&home).args(["--db", &db, "task", "add", "T-2", "Review"]).assert().success();
    (home, db)
}

#[test]
fn init_creates_database() {
    let (home, db) = setup_home();
    hv(&home)
        .args(["--db", &db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));
    assert!(std::path::Path::new(&db).exists());
}

#[test]
fn users_and_tasks_are_listed() {
    let (home, db) = seeded();
    hv(&home)
        .args(["--db", &db, "user", "list"])
        .assert()
        .success()
        .stdout(contains("Alice Liddell").and(contains("Bob Stone")));
    hv(&home)
        .args(["--db", &db, "task", "list"])
        .assert()
        .success()
        .stdout(contains("Write report").and(contains("Review")));
}

#[test]
fn duplicate_user_fails() {
    let (home, db) = seeded();
    hv(&home)
        .args(["--db", &db, "user", "add", "alice", "Again"])
        .assert()
        .failure()
        .stderr(contains("Already exists"));
}

#[test]
fn unknown_option_is_rejected() {
    let (home, db) = seeded();
    hv(&home)
        .args(["--db", &db, "task", "add", "T-3", "Oops", "--urgency", "whenever"])
        .assert()
        .failure()
        .stderr(contains("Invalid urgency option"));
}

#[test]
fn timer_needs_a_session() {
    let (home, db) = seeded();
    hv(&home)
        .args(["--db", &db, "timer", "start", "T-1"])
        .assert()
        .failure()
        .stderr(contains("No active work session"));
}

#[test]
fn session_and_timer_flow() {
    let (home, db) = seeded();
    hv(&home).args(["--db", &db, "session", "start"]).assert().success();
    hv(&home)
        .args(["--db", &db, "session", "start"])
        .assert()
        .failure()
        .stderr(contains("already active"));

    hv(&home)
        .args(["--db", &db, "timer", "start", "T-1"])
        .assert()
        .success()
        .stdout(contains("Tracking 'T-1'"));
    hv(&home)
        .args(["--db", &db, "timer", "start", "T-1"])
        .assert()
        .failure()
        .stderr(contains("already running"));

    hv(&home)
        .args(["--db", &db, "session", "pause"])
        .assert()
        .success()
        .stdout(contains("T-1"));
    hv(&home)
        .args(["--db", &db, "timer", "start", "T-2"])
        .assert()
        .failure()
        .stderr(contains("is paused"));
    hv(&home)
        .args(["--db", &db, "session", "resume"])
        .assert()
        .success()
        .stdout(contains("Restarted timers: T-1"));

    hv(&home)
        .args(["--db", &db, "session", "show"])
        .assert()
        .success()
        .stdout(contains("active"));
    hv(&home)
        .args(["--db", &db, "timer", "stop", "T-1"])
        .assert()
        .success()
        .stdout(contains("Stopped 'T-1'"));
    hv(&home)
        .args(["--db", &db, "session", "stop"])
        .assert()
        .success()
        .stdout(contains("Work session closed"));
}

#[test]
fn other_user_via_flag() {
    let (home, db) = seeded();
    hv(&home).args(["--db", &db, "-u", "bob", "session", "start"]).assert().success();
    hv(&home).args(["--db", &db, "-u", "bob", "timer", "start", "T-2"]).assert().success();
    hv(&home)
        .args(["--db", &db, "status", "T-2"])
        .assert()
        .success()
        .stdout(contains("Bob Stone").and(contains("no limit")));
}

#[test]
fn status_json_reports_budget() {
    let (home, db) = seeded();
    let out = hv(&home)
        .args(["--db", &db, "status", "T-1", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["task_id"], "T-1");
    assert_eq!(json["total_seconds"], 0);
    assert_eq!(json["any_running"], false);
    assert_eq!(json["budget"]["mode"], "bounded");
    assert_eq!(json["budget"]["budget_seconds"], 3600);
    assert_eq!(json["budget"]["band"], "nominal");
}

#[test]
fn budget_can_be_cleared() {
    let (home, db) = seeded();
    hv(&home).args(["--db", &db, "task", "budget", "T-1", "none"]).assert().success();
    let out = hv(&home)
        .args(["--db", &db, "status", "T-1", "--json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["budget"]["mode"], "unbounded");

    hv(&home)
        .args(["--db", &db, "task", "budget", "T-1", "soon"])
        .assert()
        .failure()
        .stderr(contains("Invalid duration"));
}

#[test]
fn unknown_task_status_fails() {
    let (home, db) = seeded();
    hv(&home)
        .args(["--db", &db, "status", "nope"])
        .assert()
        .failure()
        .stderr(contains("Unknown task: nope"));
}

#[test]
fn watch_for_zero_renders_once() {
    let (home, db) = seeded();
    hv(&home)
        .args(["--db", &db, "watch", "T-1", "--for", "0"])
        .assert()
        .success()
        .stdout(contains("Write report").and(contains("Budget")));
}

#[test]
fn log_lists_operations() {
    let (home, db) = seeded();
    hv(&home)
        .args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied").and(contains("task_add")).and(contains("user_add")));
}

#[test]
fn config_check_and_migrate() {
    let (home, db) = setup_home();
    std::fs::write(home.path().join("hivetime.conf"), format!("database: {db}\n")).unwrap();

    hv(&home)
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("Missing fields").and(contains("tick_interval_ms")));
    hv(&home)
        .args(["config", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Added fields"));
    hv(&home)
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("complete"));
}
