use crate::cli::commands::open_with_car;
use crate::cli::parser::{Cli, Commands, GarageAction, TableAction};
use crate::config::Config;
use crate::core::events::owned_session;
use crate::core::garage::{EventChoice, GarageLogic, TableOp, default_title, modified_title};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, hint, info, success, warning};
use crate::ui::prompt::ask_choice;
use crate::ui::sheet::{print_events, print_sheet};
use crate::utils::colors::colorize_value;
use chrono::Local;

/// Convert a 1-based index given on the command line.
fn index(n: usize, what: &str) -> AppResult<usize> {
    n.checked_sub(1)
        .ok_or_else(|| AppError::InvalidTable(format!("{what} numbers start at 1")))
}

fn table_op(action: &TableAction) -> AppResult<TableOp> {
    Ok(match action {
        TableAction::AddRow => TableOp::AddRow,
        TableAction::AddColumn => TableOp::AddColumn,
        TableAction::DeleteRow { row } => TableOp::DeleteRow(index(*row, "row")?),
        TableAction::DeleteColumn { col } => TableOp::DeleteColumn(index(*col, "column")?),
        TableAction::Header { col, text } => TableOp::SetHeader {
            col: index(*col, "column")?,
            text: text.clone(),
        },
        TableAction::Cell { row, col, text } => TableOp::SetCell {
            row: index(*row, "row")?,
            col: index(*col, "column")?,
            text: text.clone(),
        },
    })
}

/// Where to save: flags win, then a recent garage event is offered.
/// Test mode adds to the recent event without asking.
fn choose_event(
    cli: &Cli,
    pool: &mut DbPool,
    car_id: i64,
    hours: i64,
    last_event: bool,
    new_event: bool,
) -> AppResult<Option<EventChoice>> {
    if new_event {
        return Ok(Some(EventChoice::New));
    }
    let recent = GarageLogic::recent_event(pool, car_id, hours, &Local::now())?;
    let Some(ev) = recent else {
        if last_event {
            warning(format!(
                "No garage event in the last {} hours, creating a new one.",
                hours
            ));
        }
        return Ok(Some(EventChoice::New));
    };
    if last_event || cli.test {
        return Ok(Some(EventChoice::Last(ev.id)));
    }

    let prompt = format!(
        "A garage event was created recently: '{}' ({}).",
        ev.name,
        ev.date_str()
    );
    Ok(
        match ask_choice(&prompt, &["add to last event", "new event", "cancel"]) {
            Some('a') => Some(EventChoice::Last(ev.id)),
            Some('n') => Some(EventChoice::New),
            _ => None,
        },
    )
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Garage { action } = &cli.command else {
        return Ok(());
    };
    let (mut pool, car) = open_with_car(cli, cfg)?;

    match action {
        GarageAction::Show => {
            let (parts, values) = GarageLogic::sheet(&mut pool, car.id)?;
            header(format!("Current setup of {}", car.name));
            print_sheet(&parts, &values, &cfg.separator_char);
        }

        GarageAction::Set { id, value } => {
            let stored = GarageLogic::set_value(&mut pool, car.id, *id, value)?;
            success(format!("Part #{} = {}", id, colorize_value(&stored)));
        }

        GarageAction::Inc { id, by } => {
            let v = GarageLogic::bump(&mut pool, car.id, *id, *by)?;
            success(format!("Part #{} = {}", id, v));
        }

        GarageAction::Dec { id, by } => {
            let v = GarageLogic::bump(&mut pool, car.id, *id, -*by)?;
            success(format!("Part #{} = {}", id, v));
        }

        GarageAction::Table { id, op } => {
            let table = GarageLogic::table_edit(&mut pool, car.id, *id, &table_op(op)?)?;
            success(format!(
                "Part #{} table is now {} row(s) x {} column(s).",
                id,
                table.rows.len(),
                table.headers.len()
            ));
        }

        GarageAction::Save {
            title,
            from,
            last_event,
            new_event,
        } => {
            let now = Local::now();
            let title = match (title, from) {
                (Some(t), _) => t.clone(),
                (None, Some(sid)) => {
                    let source = owned_session(&pool.conn, car.id, *sid)?;
                    modified_title(&source.name, &now)
                }
                (None, None) => default_title(&now),
            };

            let Some(choice) = choose_event(
                cli,
                &mut pool,
                car.id,
                cfg.recent_event_hours,
                *last_event,
                *new_event,
            )?
            else {
                warning("Save cancelled.");
                return Ok(());
            };

            let (event, session) = GarageLogic::save(&mut pool, car.id, &title, choice, &now)?;
            success(format!(
                "Setup saved as session #{} '{}' in event #{} '{}'.",
                session.id, session.name, event.id, event.name
            ));
        }

        GarageAction::Load { session } => {
            let (s, n) = GarageLogic::load_session(&mut pool, car.id, *session)?;
            success(format!("Loaded {} value(s) from '{}'.", n, s.name));
            hint(format!(
                "Save your changes with `rsetup garage save --from {}` to title them '{}'.",
                s.id,
                modified_title(&s.name, &Local::now())
            ));
        }

        GarageAction::History => {
            let events = GarageLogic::history(&mut pool, car.id)?;
            header(format!("Garage history of {}", car.name));
            if events.is_empty() {
                info("No garage sessions saved yet.");
            } else {
                print_events(&events);
            }
        }
    }

    Ok(())
}
