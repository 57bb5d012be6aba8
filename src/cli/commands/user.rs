use crate::cli::parser::{Commands, UserAction};
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::queries::{insert_user, list_users};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};
use chrono::Utc;

use super::open_db;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::User { action } = cmd else {
        return Ok(());
    };
    let pool = open_db(cfg)?;

    match action {
        UserAction::Add { id, name } => {
            insert_user(&pool.conn, id, name, Utc::now())?;
            ttlog(&pool.conn, "user_add", id, &format!("Registered {}", name))?;
            success(format!("User '{}' ({}) added.", id, name));
        }
        UserAction::List => {
            let users = list_users(&pool.conn)?;
            if users.is_empty() {
                info("No users yet. Add one with `hivetime user add <id> <name>`.");
                return Ok(());
            }
            let mut table = Table::new(vec![Column::new("ID", 16), Column::new("NAME", 24)]);
            for u in users {
                table.add_row(vec![u.id, u.name]);
            }
            print!("{}", table.render());
        }
    }
    Ok(())
}
