use crate::cli::parser::{Commands, TaskAction};
use crate::config::Config;
use crate::core::calculator::aggregate::aggregate;
use crate::core::calculator::budget::evaluate;
use crate::core::options::OptionStore;
use crate::db::log::ttlog;
use crate::db::queries::{get_task, insert_task, list_tasks, load_options, load_records_for_task, set_task_budget};
use crate::errors::{AppError, AppResult};
use crate::models::task::Task;
use crate::models::task_option::OptionKind;
use crate::ui::messages::{info, success};
use crate::utils::colors::{color_by_name, color_for_band, paint};
use crate::utils::table::{Column, Table};
use crate::utils::time::{format_seconds, humanize_seconds, parse_duration};
use chrono::Utc;

use super::open_db;

/// `none`, `off`, `-` or a zero duration clear the budget.
fn parse_budget(raw: &str) -> AppResult<Option<i64>> {
    match raw.trim().to_lowercase().as_str() {
        "none" | "off" | "-" => Ok(None),
        other => {
            let secs = parse_duration(other)?;
            Ok(if secs > 0 { Some(secs) } else { None })
        }
    }
}

fn option_cell(store: &OptionStore, kind: OptionKind, value: &str) -> String {
    match store.get(kind, value) {
        Some(o) => paint(&o.label, color_by_name(&o.color)),
        None => value.to_string(),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Task { action } = cmd else {
        return Ok(());
    };
    let pool = open_db(cfg)?;
    let store = OptionStore::new(load_options(&pool.conn)?);

    match action {
        TaskAction::Add {
            id,
            title,
            budget,
            status,
            urgency,
        } => {
            let status = match status {
                Some(s) => s.clone(),
                None => store.first_value(OptionKind::Status).unwrap_or("todo").to_string(),
            };
            let urgency = urgency.clone().unwrap_or_else(|| "normal".to_string());
            store.validate(OptionKind::Status, &status)?;
            store.validate(OptionKind::Urgency, &urgency)?;

            let budget_seconds = match budget {
                Some(b) => parse_budget(b)?,
                None => None,
            };

            let task = Task {
                id: id.clone(),
                title: title.clone(),
                status,
                urgency,
                budget_seconds,
                created_at: Utc::now(),
            };
            insert_task(&pool.conn, &task)?;
            ttlog(&pool.conn, "task_add", id, title)?;

            match budget_seconds {
                Some(b) => success(format!("Task '{}' added with a budget of {}.", id, humanize_seconds(b))),
                None => success(format!("Task '{}' added (no time limit).", id)),
            }
        }

        TaskAction::Budget { id, budget } => {
            let budget_seconds = parse_budget(budget)?;
            set_task_budget(&pool.conn, id, budget_seconds)?;

            let msg = match budget_seconds {
                Some(b) => format!("Budget set to {}", humanize_seconds(b)),
                None => "Budget removed".to_string(),
            };
            ttlog(&pool.conn, "task_budget", id, &msg)?;
            success(format!("{} for task '{}'.", msg, id));
        }

        TaskAction::List => {
            let tasks = list_tasks(&pool.conn)?;
            if tasks.is_empty() {
                info("No tasks yet. Add one with `hivetime task add <id> <title>`.");
                return Ok(());
            }

            let now = Utc::now();
            let thresholds = cfg.thresholds();
            let mut table = Table::new(vec![
                Column::new("ID", 12),
                Column::new("TITLE", 28),
                Column::new("STATUS", 12),
                Column::new("URGENCY", 9),
                Column::new("TRACKED", 10),
                Column::new("BUDGET", 9),
                Column::new("", 3),
            ]);

            for t in tasks {
                let records = load_records_for_task(&pool.conn, &t.id)?;
                let tally = aggregate(&records, now);

                let tracked = match evaluate(tally.total_seconds, t.budget_seconds, &thresholds).band() {
                    Some(band) => paint(&format_seconds(tally.total_seconds), color_for_band(band)),
                    None => format_seconds(tally.total_seconds),
                };

                table.add_row(vec![
                    t.id.clone(),
                    crate::utils::formatting::truncate(&t.title, 28),
                    option_cell(&store, OptionKind::Status, &t.status),
                    option_cell(&store, OptionKind::Urgency, &t.urgency),
                    tracked,
                    t.budget_seconds.map(humanize_seconds).unwrap_or_else(|| "—".into()),
                    if tally.any_running { "⏱".into() } else { String::new() },
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}

/// Resolve a task or fail with `UnknownTask`.
pub(crate) fn require_task(conn: &rusqlite::Connection, id: &str) -> AppResult<Task> {
    get_task(conn, id)?.ok_or_else(|| AppError::UnknownTask(id.to_string()))
}
