use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::aggregate::TaskTally;
use crate::core::calculator::budget::Thresholds;
use crate::core::clock::{Clock, SystemClock};
use crate::core::feed::EventSource;
use crate::core::options::OptionStore;
use crate::core::poller::RecordPoller;
use crate::core::ticker::Ticker;
use crate::db::queries::{list_users, load_options};
use crate::errors::{AppError, AppResult};
use crate::models::contributor::Directory;
use crate::models::task::Task;
use rusqlite::Connection;
use std::future::Future;
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

use super::open_db;
use super::status::{StatusReport, build_report, render};
use super::task::require_task;

pub struct WatchOptions {
    pub thresholds: Thresholds,
    pub tick: Duration,
    pub poll: Duration,
    /// `None` watches until shutdown; `Some(ZERO)` draws once.
    pub limit: Option<Duration>,
}

impl WatchOptions {
    pub fn from_config(cfg: &Config, limit: Option<Duration>) -> Self {
        Self {
            thresholds: cfg.thresholds(),
            tick: cfg.tick_interval(),
            poll: cfg.poll_interval(),
            limit,
        }
    }
}

fn report_of(
    tally: &Mutex<TaskTally>,
    task: &Task,
    directory: &Directory,
    options: &OptionStore,
    opts: &WatchOptions,
    clock: &dyn Clock,
) -> AppResult<(StatusReport, bool)> {
    let tally = tally
        .lock()
        .map_err(|_| AppError::Other("task tally lock poisoned".into()))?;
    let report = build_report(task, &tally, directory, options, &opts.thresholds, clock.now());
    Ok((report, tally.any_running()))
}

/// Keep a task's live tally current until `limit` elapses or `shutdown`
/// resolves, handing every refreshed report to `draw`. Returns the number
/// of frames drawn.
///
/// The display ticker only runs while at least one contributor is
/// tracking. Status and urgency options are reloaded on every poll and a
/// relabel redraws. A failed poll keeps the last known values on screen.
pub async fn watch_task(
    conn: &Connection,
    task: &Task,
    directory: &Directory,
    opts: WatchOptions,
    clock: Arc<dyn Clock>,
    shutdown: impl Future<Output = ()>,
    mut draw: impl FnMut(&StatusReport),
) -> AppResult<usize> {
    let tally = Arc::new(Mutex::new(TaskTally::new(&task.id)));
    let mut poller = RecordPoller::new(&task.id);

    let _subscription = {
        let tally = Arc::clone(&tally);
        let clock = Arc::clone(&clock);
        poller.subscribe(Box::new(move |change| match tally.lock() {
            Ok(mut t) => {
                t.apply(change, clock.now());
            }
            Err(_) => tracing::error!("task tally lock poisoned, change dropped"),
        }))
    };

    let mut options = OptionStore::new(load_options(conn)?);
    let relabelled = Arc::new(AtomicBool::new(false));
    let _options_subscription = {
        let relabelled = Arc::clone(&relabelled);
        options.subscribe(Box::new(move |kind| {
            tracing::debug!(?kind, "task options changed");
            relabelled.store(true, Ordering::Relaxed);
        }))
    };

    poller.poll_once(conn)?;

    let (report, mut running) = report_of(&tally, task, directory, &options, &opts, clock.as_ref())?;
    draw(&report);
    let mut frames = 1;

    if opts.limit == Some(Duration::ZERO) {
        return Ok(frames);
    }

    let mut ticker = Ticker::new(opts.tick);
    let mut poll = tokio::time::interval_at(Instant::now() + opts.poll, opts.poll);
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let deadline = async {
        match opts.limit {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);
    tokio::pin!(shutdown);

    loop {
        ticker.sync(running);

        let redraw = tokio::select! {
            _ = ticker.tick() => true,
            _ = poll.tick() => {
                match load_options(conn) {
                    Ok(fresh) => options.replace(fresh),
                    Err(e) => tracing::warn!(error = %e, "options reload failed, keeping last labels"),
                }
                let changed = match poller.poll_once(conn) {
                    Ok(n) => n > 0,
                    Err(e) => {
                        tracing::warn!(task_id = %task.id, error = %e, "poll failed, keeping last values");
                        false
                    }
                };
                relabelled.swap(false, Ordering::Relaxed) || changed
            }
            _ = &mut shutdown => break,
            _ = &mut deadline => break,
        };

        if redraw {
            let (report, now_running) = report_of(&tally, task, directory, &options, &opts, clock.as_ref())?;
            running = now_running;
            draw(&report);
            frames += 1;
        }
    }

    ticker.disarm();
    tracing::debug!(task_id = %task.id, frames, "watch finished");
    Ok(frames)
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Watch { task, duration } = cmd else {
        return Ok(());
    };
    let pool = open_db(cfg)?;
    let task = require_task(&pool.conn, task)?;
    let directory = Directory::new(&list_users(&pool.conn)?);
    let opts = WatchOptions::from_config(cfg, duration.map(Duration::from_secs));

    let interactive = std::io::stdout().is_terminal();
    let draw = |report: &StatusReport| {
        if interactive {
            print!("\x1b[2J\x1b[H");
        }
        print!("{}", render(report));
        if interactive {
            println!("\n  (Ctrl-C to stop)");
        } else {
            println!();
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch_task(
        &pool.conn,
        &task,
        &directory,
        opts,
        Arc::new(SystemClock),
        shutdown,
        draw,
    ))?;
    Ok(())
}
