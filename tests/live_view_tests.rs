use hivetime::cli::commands::status::{StatusReport, build_report, render};
use hivetime::cli::commands::watch::{WatchOptions, watch_task};
use hivetime::core::calculator::aggregate::TaskTally;
use hivetime::core::calculator::budget::{BudgetStatus, Thresholds};
use hivetime::core::clock::{Clock, ManualClock};
use hivetime::core::options::{OptionStore, default_options};
use hivetime::core::ticker::Ticker;
use hivetime::db::queries::upsert_record;
use hivetime::models::contributor::{Contributor, Directory};
use hivetime::utils::formatting::strip_ansi;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

mod common;
use common::{at, memory_db, running, stopped, task};

fn opts(limit: Option<Duration>) -> WatchOptions {
    WatchOptions {
        thresholds: Thresholds::default(),
        tick: Duration::from_secs(1),
        poll: Duration::from_secs(2),
        limit,
    }
}

fn clock_at(secs: i64) -> Arc<dyn Clock> {
    Arc::new(ManualClock::new(at(secs)))
}

#[tokio::test(start_paused = true)]
async fn disarmed_ticker_never_fires() {
    let mut ticker = Ticker::new(Duration::from_secs(1));
    assert!(!ticker.is_armed());
    let waited = tokio::time::timeout(Duration::from_secs(30), ticker.tick()).await;
    assert!(waited.is_err());
}

#[tokio::test(start_paused = true)]
async fn armed_ticker_fires_every_period() {
    let mut ticker = Ticker::new(Duration::from_secs(1));
    ticker.sync(true);
    assert!(ticker.is_armed());

    let start = Instant::now();
    ticker.tick().await;
    ticker.tick().await;
    assert_eq!(start.elapsed(), Duration::from_secs(2));

    ticker.sync(false);
    assert!(!ticker.is_armed());
    assert!(tokio::time::timeout(Duration::from_secs(5), ticker.tick()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn watch_ticks_while_running() {
    let conn = memory_db();
    upsert_record(&conn, &running("T-1", "alice", 0, at(0))).unwrap();

    let mut seen: Vec<bool> = Vec::new();
    let frames = watch_task(
        &conn,
        &task("T-1", Some(3600)),
        &Directory::default(),
        opts(Some(Duration::from_secs(5))),
        clock_at(30),
        std::future::pending::<()>(),
        |r: &StatusReport| seen.push(r.any_running),
    )
    .await
    .unwrap();

    assert!((5..=6).contains(&frames), "frames {frames}");
    assert_eq!(seen.len(), frames);
    assert!(seen.iter().all(|r| *r));
}

#[tokio::test(start_paused = true)]
async fn watch_stays_quiet_while_stopped() {
    let conn = memory_db();
    upsert_record(&conn, &stopped("T-1", "alice", 90)).unwrap();

    let mut totals = Vec::new();
    let frames = watch_task(
        &conn,
        &task("T-1", None),
        &Directory::default(),
        opts(Some(Duration::from_secs(10))),
        clock_at(0),
        std::future::pending::<()>(),
        |r: &StatusReport| totals.push(r.total_seconds),
    )
    .await
    .unwrap();

    assert_eq!(frames, 1);
    assert_eq!(totals, vec![90]);
}

#[tokio::test(start_paused = true)]
async fn watch_draws_once_for_zero_limit() {
    let conn = memory_db();
    let frames = watch_task(
        &conn,
        &task("T-1", None),
        &Directory::default(),
        opts(Some(Duration::ZERO)),
        clock_at(0),
        std::future::pending::<()>(),
        |_: &StatusReport| {},
    )
    .await
    .unwrap();
    assert_eq!(frames, 1);
}

#[tokio::test(start_paused = true)]
async fn watch_ends_on_shutdown() {
    let conn = memory_db();
    let frames = watch_task(
        &conn,
        &task("T-1", None),
        &Directory::default(),
        opts(None),
        clock_at(0),
        tokio::time::sleep(Duration::from_secs(3)),
        |_: &StatusReport| {},
    )
    .await
    .unwrap();
    assert_eq!(frames, 1);
}

#[tokio::test(start_paused = true)]
async fn failed_poll_keeps_last_values() {
    let conn = memory_db();
    upsert_record(&conn, &running("T-1", "alice", 0, at(0))).unwrap();

    let mut totals = Vec::new();
    let frames = watch_task(
        &conn,
        &task("T-1", Some(3600)),
        &Directory::default(),
        opts(Some(Duration::from_secs(5))),
        clock_at(30),
        std::future::pending::<()>(),
        |r: &StatusReport| {
            if totals.is_empty() {
                conn.execute_batch("DROP TABLE time_tracking").unwrap();
            }
            totals.push((r.total_seconds, r.any_running));
        },
    )
    .await
    .unwrap();

    assert!((5..=6).contains(&frames), "frames {frames}");
    assert_eq!(totals.len(), frames);
    assert!(totals.iter().all(|t| *t == (30, true)), "{totals:?}");
}

#[tokio::test(start_paused = true)]
async fn relabelled_status_redraws() {
    let conn = memory_db();
    upsert_record(&conn, &stopped("T-1", "alice", 90)).unwrap();

    let mut labels = Vec::new();
    let frames = watch_task(
        &conn,
        &task("T-1", None),
        &Directory::default(),
        opts(Some(Duration::from_secs(5))),
        clock_at(0),
        std::future::pending::<()>(),
        |r: &StatusReport| {
            if labels.is_empty() {
                conn.execute(
                    "UPDATE task_options SET label = 'Doing' WHERE kind = 'status' AND value = 'todo'",
                    [],
                )
                .unwrap();
            }
            labels.push(r.status.clone());
        },
    )
    .await
    .unwrap();

    assert_eq!(frames, 2);
    assert_eq!(labels, vec!["To do".to_string(), "Doing".to_string()]);
}

#[test]
fn report_combines_tally_and_budget() {
    let mut tally = TaskTally::new("T-1");
    tally.ingest(&[stopped("T-1", "bob", 100), running("T-1", "alice", 20, at(0))], at(0));
    let directory = Directory::new(&[Contributor {
        id: "alice".into(),
        name: "Alice Liddell".into(),
    }]);

    let options = OptionStore::new(default_options());

    let report = build_report(
        &task("T-1", Some(200)),
        &tally,
        &directory,
        &options,
        &Thresholds::default(),
        at(45),
    );
    assert_eq!(report.status, "To do");
    assert_eq!(report.urgency, "Normal");
    assert_eq!(report.total_seconds, 165);
    assert!(report.any_running);
    assert_eq!(report.contributors[0].name, "bob");
    assert_eq!(report.contributors[1].name, "Alice Liddell");
    match report.budget {
        BudgetStatus::Bounded(u) => assert!((u.percentage - 82.5).abs() < 1e-9),
        BudgetStatus::Unbounded => panic!("expected a budget"),
    }

    let text = strip_ansi(&render(&report));
    assert!(text.contains("00:02:45"));
    assert!(text.contains("warning"));
    assert!(text.contains("running"));
    assert!(text.contains("To do · Normal"));
}
