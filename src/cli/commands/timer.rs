use crate::cli::parser::{Commands, TimerAction};
use crate::config::Config;
use crate::core::timer::TimerLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::time::format_seconds;
use chrono::Utc;

use super::open_db;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Timer { action } = cmd else {
        return Ok(());
    };
    let pool = open_db(cfg)?;
    let user = cfg.default_user.as_str();
    let now = Utc::now();

    match action {
        TimerAction::Start { task } => {
            let rec = TimerLogic::start(&pool.conn, task, user, now, cfg.require_active_session)?;
            success(format!(
                "⏱  Tracking '{}' as {} (so far {}).",
                task,
                user,
                format_seconds(rec.total_seconds)
            ));
        }
        TimerAction::Stop { task } => {
            let rec = TimerLogic::stop(&pool.conn, task, user, now)?;
            success(format!(
                "⏹  Stopped '{}' for {}: {} tracked in total.",
                task,
                user,
                format_seconds(rec.total_seconds)
            ));
        }
    }
    Ok(())
}
