use crate::cli::commands::{confirmed, open_with_car};
use crate::cli::parser::{Cli, Commands, EventAction};
use crate::config::Config;
use crate::core::events::{EventLogic, owned_event};
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::ui::sheet::print_events;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Event { action } = &cli.command else {
        return Ok(());
    };
    let (mut pool, car) = open_with_car(cli, cfg)?;

    match action {
        EventAction::Show { id } => {
            let ev = EventLogic::show(&mut pool, car.id, *id)?;
            print_events(std::slice::from_ref(&ev));
        }

        EventAction::Rename { id, name } => {
            EventLogic::rename_event(&mut pool, car.id, *id, name)?;
            success(format!("Event #{} renamed to '{}'.", id, name.trim()));
        }

        EventAction::Delete { id, yes } => {
            let ev = owned_event(&pool.conn, car.id, *id)?;
            let prompt = format!(
                "Delete event '{}' with all its sessions and saved setups?",
                ev.name
            );
            if !confirmed(cli, *yes, &prompt) {
                warning("Deletion cancelled.");
                return Ok(());
            }
            EventLogic::delete_event(&mut pool, car.id, *id)?;
            success(format!("Event #{} '{}' deleted.", ev.id, ev.name));
        }

        EventAction::AddSession { id, name } => {
            let s = EventLogic::add_session(&mut pool, car.id, *id, name)?;
            success(format!("Session #{} '{}' added to event #{}.", s.id, s.name, id));
        }
    }

    Ok(())
}
