pub mod car;
pub mod config;
pub mod db;
pub mod event;
pub mod garage;
pub mod init;
pub mod log;
pub mod part;
pub mod session;
pub mod track;
pub mod trackside;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::cars::CarLogic;
use crate::db::initialize::open_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::car::Car;
use crate::ui::prompt::ask_confirmation;

/// Open the configured database (migrated) and resolve the active car.
pub(crate) fn open_with_car(cli: &Cli, cfg: &Config) -> AppResult<(DbPool, Car)> {
    let pool = open_db(&cfg.database)?;
    let car = CarLogic::resolve_active(&pool.conn, cli.car, cfg)?;
    Ok((pool, car))
}

/// Ask before a destructive action unless `--yes` or test mode says so.
pub(crate) fn confirmed(cli: &Cli, yes: bool, prompt: &str) -> bool {
    yes || cli.test || ask_confirmation(prompt)
}
