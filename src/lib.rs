//! rSetup library root.
//! Exposes CLI parser, high-level run() function, and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Track { .. } => cli::commands::track::handle(&cli.command, cfg),
        Commands::Car { .. } => cli::commands::car::handle(cli, cfg),
        Commands::Part { .. } => cli::commands::part::handle(cli, cfg),
        Commands::Garage { .. } => cli::commands::garage::handle(cli, cfg),
        Commands::Trackside { .. } => cli::commands::trackside::handle(cli, cfg),
        Commands::Event { .. } => cli::commands::event::handle(cli, cfg),
        Commands::Session { .. } => cli::commands::session::handle(cli, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once; --db overrides its database path
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_db_path(Some(custom_db.as_str()))
            .to_string_lossy()
            .to_string();
    }

    dispatch(&cli, &cfg)
}
