use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::aggregate::{ContributorShare, TaskTally};
use crate::core::calculator::budget::{BudgetStatus, Thresholds, evaluate};
use crate::core::options::OptionStore;
use crate::db::queries::{list_users, load_options, load_records_for_task};
use crate::errors::AppResult;
use crate::models::contributor::Directory;
use crate::models::task::Task;
use crate::models::task_option::OptionKind;
use crate::utils::colors::{color_for_band, colorize_running, paint};
use crate::utils::formatting::{bold, progress_bar};
use crate::utils::table::{Column, Table};
use crate::utils::time::{format_seconds, humanize_seconds};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::open_db;
use super::task::require_task;

const BAR_WIDTH: usize = 30;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub task_id: String,
    pub title: String,
    pub status: String,
    pub urgency: String,
    pub total_seconds: i64,
    pub any_running: bool,
    pub contributors: Vec<ContributorShare>,
    pub budget: BudgetStatus,
}

pub fn build_report(
    task: &Task,
    tally: &TaskTally,
    directory: &Directory,
    options: &OptionStore,
    thresholds: &Thresholds,
    now: DateTime<Utc>,
) -> StatusReport {
    let summary = tally.summary(now);
    let label = |kind, value: &str| options.label_for(kind, value).unwrap_or(value).to_string();
    StatusReport {
        task_id: task.id.clone(),
        title: task.title.clone(),
        status: label(OptionKind::Status, &task.status),
        urgency: label(OptionKind::Urgency, &task.urgency),
        total_seconds: summary.total_seconds,
        any_running: summary.any_running,
        contributors: tally.breakdown(directory, now),
        budget: evaluate(summary.total_seconds, task.budget_seconds, thresholds),
    }
}

pub fn render(report: &StatusReport) -> String {
    let mut out = String::new();
    let running = if report.any_running { " ⏱ running" } else { "" };
    out.push_str(&format!("{}{}\n", bold(&format!("{} · {}", report.task_id, report.title)), running));
    out.push_str(&format!("  {} · {}\n\n", report.status, report.urgency));

    if report.contributors.is_empty() {
        out.push_str("  No time tracked yet.\n");
    } else {
        let mut table = Table::new(vec![
            Column::new("CONTRIBUTOR", 24),
            Column::new("TIME", 10),
            Column::new("", 8),
        ]);
        for c in &report.contributors {
            table.add_row(vec![
                c.name.clone(),
                colorize_running(&format_seconds(c.seconds), c.is_running),
                if c.is_running { "running".into() } else { String::new() },
            ]);
        }
        out.push_str(&table.render());
    }

    out.push_str(&format!("\n  Total:  {}\n", format_seconds(report.total_seconds)));

    match &report.budget {
        BudgetStatus::Unbounded => out.push_str("  Budget: no limit\n"),
        BudgetStatus::Bounded(u) => {
            let color = color_for_band(u.band);
            out.push_str(&format!(
                "  Budget: {} {} {:.1}% ({})\n",
                humanize_seconds(u.budget_seconds),
                paint(&progress_bar(u.percentage, BAR_WIDTH), color),
                u.percentage,
                paint(u.band.as_str(), color)
            ));
            if u.is_over_budget {
                out.push_str(&format!(
                    "  Over:   {} {} {:.1}% of a second budget\n",
                    humanize_seconds(-u.remaining_seconds()),
                    paint(&progress_bar(u.overtime_percentage(), BAR_WIDTH), color),
                    u.overtime_percentage()
                ));
            } else {
                out.push_str(&format!("  Left:   {}\n", humanize_seconds(u.remaining_seconds())));
            }
        }
    }
    out
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Status { task, json } = cmd else {
        return Ok(());
    };
    let pool = open_db(cfg)?;
    let task = require_task(&pool.conn, task)?;
    let directory = Directory::new(&list_users(&pool.conn)?);
    let options = OptionStore::new(load_options(&pool.conn)?);

    let now = Utc::now();
    let mut tally = TaskTally::new(&task.id);
    tally.ingest(&load_records_for_task(&pool.conn, &task.id)?, now);

    let report = build_report(&task, &tally, &directory, &options, &cfg.thresholds(), now);
    if *json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render(&report));
    }
    Ok(())
}
