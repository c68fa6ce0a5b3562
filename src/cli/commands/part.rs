use crate::cli::commands::{confirmed, open_with_car};
use crate::cli::parser::{Cli, Commands, EntryTypeArg, MoveArg, PartAction};
use crate::config::Config;
use crate::core::ordering::Direction;
use crate::core::parts::{PartLogic, PartSpec};
use crate::errors::{AppError, AppResult};
use crate::models::location::DisplayLocation;
use crate::models::part::EntryType;
use crate::ui::messages::{header, info, success, warning};
use crate::ui::sheet::print_layout;

fn parse_location(code: &str) -> AppResult<DisplayLocation> {
    DisplayLocation::from_code(code).ok_or_else(|| AppError::InvalidLocation(code.to_string()))
}

impl From<EntryTypeArg> for EntryType {
    fn from(arg: EntryTypeArg) -> Self {
        match arg {
            EntryTypeArg::Text => EntryType::Text,
            EntryTypeArg::Number => EntryType::Number,
            EntryTypeArg::Table => EntryType::Table,
        }
    }
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Part { action } = &cli.command else {
        return Ok(());
    };
    let (mut pool, car) = open_with_car(cli, cfg)?;

    match action {
        PartAction::Add {
            name,
            entry_type,
            unit,
            locations,
            subheading,
            order,
        } => {
            let locations = locations
                .iter()
                .map(|c| parse_location(c))
                .collect::<AppResult<Vec<_>>>()?;
            let spec = PartSpec {
                name: name.clone(),
                unit: unit.clone(),
                entry_type: (*entry_type).into(),
                locations,
                subheading: subheading.clone(),
                order: *order,
            };
            for p in PartLogic::add(&mut pool, car.id, &spec)? {
                success(format!(
                    "Part #{} '{}' added at {} / {}.",
                    p.id,
                    p.name,
                    p.location_label(),
                    p.subheading_label()
                ));
            }
        }

        PartAction::List => {
            header(format!("Parts of {}", car.name));
            print_layout(&PartLogic::list(&mut pool, car.id)?);
        }

        PartAction::Move { id, direction } => {
            let dir = match direction {
                MoveArg::Up => Direction::Up,
                MoveArg::Down => Direction::Down,
            };
            if PartLogic::move_part(&mut pool, car.id, *id, dir)? {
                success(format!("Part #{} moved.", id));
            } else {
                info(format!("Part #{} is already at the edge of its group.", id));
            }
        }

        PartAction::Place {
            id,
            before,
            location,
            subheading,
        } => {
            let n = match (before, location) {
                (Some(target), _) => PartLogic::place_before(&mut pool, car.id, *id, *target)?,
                (None, Some(loc)) => PartLogic::place_in_group(
                    &mut pool,
                    car.id,
                    *id,
                    parse_location(loc)?,
                    subheading.clone(),
                )?,
                (None, None) => {
                    return Err(AppError::Validation(
                        "either --before or --loc is required".into(),
                    ));
                }
            };
            success(format!("Part #{} placed ({} part(s) updated).", id, n));
        }

        PartAction::RenameSub { location, old, new } => {
            let n = PartLogic::rename_subheading(
                &mut pool,
                car.id,
                parse_location(location)?,
                old,
                new,
            )?;
            success(format!("Subheading renamed on {} part(s).", n));
        }

        PartAction::Delete { id, yes } => {
            let (part, usage) = PartLogic::usage(&mut pool, car.id, *id)?;
            if !usage.is_empty() {
                warning(format!(
                    "'{}' has values saved in {} session(s):",
                    part.name,
                    usage.len()
                ));
                for u in &usage {
                    println!("    {} ({}) / {}", u.event, u.date.format("%Y-%m-%d"), u.session);
                }
            }
            let prompt = format!("Delete part '{}' and its saved values?", part.name);
            if !confirmed(cli, *yes, &prompt) {
                warning("Deletion cancelled.");
                return Ok(());
            }
            let scrubbed = PartLogic::delete(&mut pool, car.id, *id)?;
            success(format!(
                "Part #{} '{}' deleted (removed from {} saved setup(s)).",
                part.id, part.name, scrubbed
            ));
        }

        PartAction::Repair => {
            let n = PartLogic::repair(&mut pool, car.id)?;
            if n == 0 {
                success("Part orders are consistent.");
            } else {
                success(format!("Repaired the order of {} part(s).", n));
            }
        }
    }

    Ok(())
}
