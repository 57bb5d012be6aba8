use crate::cli::parser::{Commands, SessionAction};
use crate::config::Config;
use crate::core::session::SessionLogic;
use crate::errors::AppResult;
use crate::models::tracking_record::TimeTrackingRecord;
use crate::models::work_session::WorkSession;
use crate::ui::messages::{field, header, info, success, warning};
use crate::utils::time::{format_seconds, humanize_seconds};
use chrono::{Local, Utc};

use super::open_db;

fn task_list(records: &[TimeTrackingRecord]) -> String {
    records
        .iter()
        .map(|r| r.task_id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_session(s: &WorkSession) {
    let now = Utc::now();
    header(format!("Work session of {} on {}", s.user_id, s.date));
    field("State", s.state_label());
    field("Login", s.login_time.with_timezone(&Local).format("%H:%M:%S"));
    if let Some(p) = s.paused_at {
        field("Paused at", p.with_timezone(&Local).format("%H:%M:%S"));
    }
    if let Some(out) = s.logout_time {
        field("Logout", out.with_timezone(&Local).format("%H:%M:%S"));
    }
    field("Paused", humanize_seconds(s.paused_seconds + s.open_pause_seconds(now)));
    field("Worked", format_seconds(s.worked_seconds(now)));
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Session { action } = cmd else {
        return Ok(());
    };
    let pool = open_db(cfg)?;
    let user = cfg.default_user.as_str();
    let now = Utc::now();

    match action {
        SessionAction::Start => {
            let s = SessionLogic::start(&pool.conn, user, now)?;
            success(format!("Work session started for {} ({}).", user, s.date));
        }
        SessionAction::Pause => {
            let (_, stopped) = SessionLogic::pause(&pool.conn, user, now)?;
            success(format!("Work session paused for {}.", user));
            if !stopped.is_empty() {
                info(format!("Stopped timers (will resume): {}", task_list(&stopped)));
            }
        }
        SessionAction::Resume => {
            let (_, restarted) = SessionLogic::resume(&pool.conn, user, now)?;
            success(format!("Work session resumed for {}.", user));
            if !restarted.is_empty() {
                info(format!("Restarted timers: {}", task_list(&restarted)));
            }
        }
        SessionAction::Stop => {
            let (s, stopped) = SessionLogic::stop(&pool.conn, user, now)?;
            success(format!(
                "Work session closed for {}: {} worked.",
                user,
                format_seconds(s.worked_seconds(now))
            ));
            if !stopped.is_empty() {
                info(format!("Stopped timers: {}", task_list(&stopped)));
            }
        }
        SessionAction::Show => match SessionLogic::current(&pool.conn, user, now)? {
            Some(s) => print_session(&s),
            None => warning(format!("No work session for {} today.", user)),
        },
    }
    Ok(())
}
