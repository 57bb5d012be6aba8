pub mod config;
pub mod init;
pub mod log;
pub mod session;
pub mod status;
pub mod task;
pub mod timer;
pub mod user;
pub mod watch;

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Open the configured database, applying pending migrations first.
pub(crate) fn open_db(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    Ok(pool)
}
