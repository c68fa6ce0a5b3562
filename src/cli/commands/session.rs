use crate::cli::commands::{confirmed, open_with_car};
use crate::cli::parser::{Cli, Commands, SessionAction};
use crate::config::Config;
use crate::core::events::{EventLogic, owned_session};
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Session { action } = &cli.command else {
        return Ok(());
    };
    let (mut pool, car) = open_with_car(cli, cfg)?;

    match action {
        SessionAction::Rename { id, name } => {
            EventLogic::rename_session(&mut pool, car.id, *id, name)?;
            success(format!("Session #{} renamed to '{}'.", id, name.trim()));
        }

        SessionAction::Delete { id, yes } => {
            let s = owned_session(&pool.conn, car.id, *id)?;
            let prompt = format!("Delete session '{}' and its saved setup?", s.name);
            if !confirmed(cli, *yes, &prompt) {
                warning("Deletion cancelled.");
                return Ok(());
            }
            EventLogic::delete_session(&mut pool, car.id, *id)?;
            success(format!("Session #{} '{}' deleted.", s.id, s.name));
        }
    }

    Ok(())
}
