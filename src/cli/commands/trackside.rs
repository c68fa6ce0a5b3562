use crate::cli::commands::open_with_car;
use crate::cli::parser::{Cli, Commands, TracksideAction};
use crate::config::Config;
use crate::core::resolve::parse_assignments;
use crate::core::trackside::{NewEvent, SessionSheet, TracksideLogic};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, hint, info, success};
use crate::ui::sheet::{print_events, print_sheet};
use crate::utils::date::{parse_date, today};

fn print_session(sheet: &SessionSheet, separator: &str) {
    header(format!("Session #{} {}", sheet.session.id, sheet.session.name));
    if !sheet.has_snapshot {
        hint("No setup submitted for this session yet; showing current values.");
    }
    print_sheet(&sheet.parts, &sheet.values, separator);
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Trackside { action } = &cli.command else {
        return Ok(());
    };
    let (mut pool, car) = open_with_car(cli, cfg)?;

    match action {
        TracksideAction::New {
            track,
            name,
            date,
            sessions,
            extra_sessions,
        } => {
            let date = match date {
                Some(d) => Some(parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?),
                None => None,
            };
            let spec = NewEvent {
                track: track.clone(),
                name: name.clone(),
                date,
                sessions: (!sessions.is_empty()).then(|| sessions.clone()),
                extra_sessions: extra_sessions.clone(),
            };
            let ev = TracksideLogic::create_event(
                &mut pool,
                car.id,
                &spec,
                &cfg.default_sessions,
                today(),
            )?;
            success(format!(
                "Event #{} '{}' created at {} on {} with {} session(s).",
                ev.event.id,
                ev.event.name,
                ev.track,
                ev.event.date_str(),
                ev.sessions.len()
            ));
            print_events(std::slice::from_ref(&ev));
        }

        TracksideAction::List => {
            header(format!("Race events of {}", car.name));
            print_events(&TracksideLogic::list_events(&mut pool, car.id)?);
        }

        TracksideAction::Today => match TracksideLogic::today(&mut pool, car.id, today())? {
            Some(ev) => print_events(std::slice::from_ref(&ev)),
            None => {
                info("No race event today.");
                hint("Create one with `rsetup trackside new <TRACK>`.");
            }
        },

        TracksideAction::Show { session } => {
            let sheet = TracksideLogic::session_sheet(&mut pool, car.id, *session)?;
            print_session(&sheet, &cfg.separator_char);
        }

        TracksideAction::Submit { session, set } => {
            let overrides = parse_assignments(set)?;
            let sheet = TracksideLogic::submit(&mut pool, car.id, *session, &overrides)?;
            success(format!(
                "Setup of session #{} '{}' submitted ({} value(s)).",
                sheet.session.id,
                sheet.session.name,
                sheet.values.len()
            ));
        }
    }

    Ok(())
}
