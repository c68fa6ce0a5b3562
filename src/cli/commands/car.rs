use crate::cli::commands::confirmed;
use crate::cli::parser::{CarAction, Cli, Commands};
use crate::config::Config;
use crate::core::cars::CarLogic;
use crate::core::config::ConfigLogic;
use crate::db::cars::get_car;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{GREEN, RESET};
use crate::utils::table::{Column, Table};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Car { action } = &cli.command else {
        return Ok(());
    };
    let mut pool = open_db(&cfg.database)?;

    match action {
        CarAction::Add { name } => {
            let car = CarLogic::add(&mut pool, name)?;
            success(format!("Car #{} '{}' added.", car.id, car.name));
        }

        CarAction::List => {
            let cars = CarLogic::list(&mut pool)?;
            if cars.is_empty() {
                info("No cars yet. Add one with `rsetup car add <NAME>`.");
                return Ok(());
            }
            let active = CarLogic::resolve_active(&pool.conn, cli.car, cfg).ok();

            let mut table = Table::new(vec![
                Column::new("", 1),
                Column::new("ID", 6),
                Column::new("Name", 40),
                Column::new("Created", 20),
            ]);
            for c in &cars {
                let mark = if active.as_ref().is_some_and(|a| a.id == c.id) {
                    "*"
                } else {
                    ""
                };
                table.add_row(vec![
                    mark.to_string(),
                    c.id.to_string(),
                    c.name.clone(),
                    c.created_at.chars().take(19).collect(),
                ]);
            }
            print!("{}", table.render());
        }

        CarAction::Rename { id, name } => {
            CarLogic::rename(&mut pool, *id, name)?;
            success(format!("Car #{} renamed to '{}'.", id, name.trim()));
        }

        CarAction::Delete { id, yes } => {
            let car = get_car(&pool.conn, *id)?;
            let prompt = format!(
                "Delete car '{}' with all its parts, events and saved setups?",
                car.name
            );
            if !confirmed(cli, *yes, &prompt) {
                warning("Deletion cancelled.");
                return Ok(());
            }
            CarLogic::delete(&mut pool, *id)?;
            success(format!("Car #{} '{}' deleted.", car.id, car.name));
        }

        CarAction::Default { id } => {
            let car = get_car(&pool.conn, *id)?;
            let mut cfg = cfg.clone();
            ConfigLogic::set_default_car(&mut cfg, car.id, cli.test)?;
            success(format!(
                "Default car is now {}#{} {}{}.",
                GREEN, car.id, car.name, RESET
            ));
        }
    }

    Ok(())
}
