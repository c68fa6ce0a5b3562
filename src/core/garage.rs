//! Garage workflow: edit the car's current setup and save it as
//! snapshots attached to garage events.

use crate::core::events::{owned_event, owned_session, with_sessions};
use crate::core::parts::load_sorted;
use crate::core::resolve::{bump, current_values, validate_value};
use crate::db::events::{events_at_track, insert_event};
use crate::db::log::ttlog_quiet;
use crate::db::parts::get_part;
use crate::db::pool::DbPool;
use crate::db::sessions::{insert_session, load_snapshot, replace_snapshot};
use crate::db::tracks::garage_track_id;
use crate::db::values::{ensure_value_row, load_current_values, upsert_value, write_values};
use crate::errors::{AppError, AppResult};
use crate::models::event::{Event, EventWithSessions};
use crate::models::part::{EntryType, Part};
use crate::models::session::{Session, SessionKind};
use crate::models::setup::SetupValues;
use crate::models::table_value::TableValue;
use crate::utils::date::{format_date, is_within_hours, title_stamp};
use chrono::{DateTime, Local};
use rusqlite::Connection;

/// Edits applied to the value of a `table` part. Indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOp {
    AddRow,
    AddColumn,
    DeleteRow(usize),
    DeleteColumn(usize),
    SetHeader { col: usize, text: String },
    SetCell { row: usize, col: usize, text: String },
}

/// Where a saved setup goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventChoice {
    /// Add a session to this existing garage event.
    Last(i64),
    New,
}

pub struct GarageLogic;

pub fn default_title(now: &DateTime<Local>) -> String {
    format!("Current Setup at {}", title_stamp(now))
}

/// Title for a setup derived from a loaded session. Titles that already
/// say where they came from are kept.
pub fn modified_title(source: &str, now: &DateTime<Local>) -> String {
    if source.starts_with("Modified from") {
        return source.to_string();
    }
    let base = source.split(" at ").next().unwrap_or(source);
    format!("Modified from {} at {}", base, title_stamp(now))
}

pub fn garage_event_name(now: &DateTime<Local>) -> String {
    format!("Garage session on {}", format_date(&now.date_naive()))
}

fn owned_part(conn: &Connection, car_id: i64, part_id: i64) -> AppResult<Part> {
    let part = get_part(conn, part_id)?;
    if part.car_id != car_id {
        return Err(AppError::PartNotFound(part_id));
    }
    Ok(part)
}

fn current_of(conn: &Connection, part_id: i64, car_id: i64) -> AppResult<String> {
    Ok(load_current_values(conn, car_id)?
        .get(part_id)
        .unwrap_or("")
        .to_string())
}

impl GarageLogic {
    /// Sorted parts of the car with their current values. Parts without a
    /// value row get an empty one.
    pub fn sheet(pool: &mut DbPool, car_id: i64) -> AppResult<(Vec<Part>, SetupValues)> {
        let parts = load_sorted(&pool.conn, car_id)?;
        for p in &parts {
            ensure_value_row(&pool.conn, p.id)?;
        }
        let current = load_current_values(&pool.conn, car_id)?;
        let values = current_values(&parts, &current);
        Ok((parts, values))
    }

    pub fn set_value(pool: &mut DbPool, car_id: i64, part_id: i64, value: &str) -> AppResult<String> {
        let part = owned_part(&pool.conn, car_id, part_id)?;
        let stored = validate_value(&part, value)?;
        upsert_value(&pool.conn, part_id, &stored)?;
        ttlog_quiet(
            &pool.conn,
            "value_set",
            &part_id.to_string(),
            &format!("{} = {}", part.name, stored),
        );
        Ok(stored)
    }

    /// Increment or decrement a number part.
    pub fn bump(pool: &mut DbPool, car_id: i64, part_id: i64, delta: f64) -> AppResult<String> {
        let part = owned_part(&pool.conn, car_id, part_id)?;
        if part.entry_type != EntryType::Number {
            return Err(AppError::Validation(format!(
                "{} is not a number part",
                part.name
            )));
        }
        let next = bump(&current_of(&pool.conn, part_id, car_id)?, delta);
        upsert_value(&pool.conn, part_id, &next)?;
        ttlog_quiet(
            &pool.conn,
            "value_set",
            &part_id.to_string(),
            &format!("{} = {}", part.name, next),
        );
        Ok(next)
    }

    pub fn table_edit(pool: &mut DbPool, car_id: i64, part_id: i64, op: &TableOp) -> AppResult<TableValue> {
        let part = owned_part(&pool.conn, car_id, part_id)?;
        if part.entry_type != EntryType::Table {
            return Err(AppError::Validation(format!(
                "{} is not a table part",
                part.name
            )));
        }
        let mut table = TableValue::parse(&current_of(&pool.conn, part_id, car_id)?)?;
        match op {
            TableOp::AddRow => table.add_row(),
            TableOp::AddColumn => table.add_column(),
            TableOp::DeleteRow(r) => table.delete_row(*r)?,
            TableOp::DeleteColumn(c) => table.delete_column(*c)?,
            TableOp::SetHeader { col, text } => table.set_header(*col, text)?,
            TableOp::SetCell { row, col, text } => table.set_cell(*row, *col, text)?,
        }
        upsert_value(&pool.conn, part_id, &table.to_json())?;
        ttlog_quiet(&pool.conn, "value_set", &part_id.to_string(), &part.name);
        Ok(table)
    }

    /// The newest garage event of the car created within the last `hours`.
    pub fn recent_event(pool: &mut DbPool, car_id: i64, hours: i64, now: &DateTime<Local>) -> AppResult<Option<Event>> {
        let garage = garage_track_id(&pool.conn)?;
        Ok(events_at_track(&pool.conn, car_id, garage)?
            .into_iter()
            .find(|e| is_within_hours(&e.created_at, now, hours)))
    }

    /// Save the current setup as a new garage session.
    pub fn save(
        pool: &mut DbPool,
        car_id: i64,
        title: &str,
        choice: EventChoice,
        now: &DateTime<Local>,
    ) -> AppResult<(Event, Session)> {
        let title = match title.trim() {
            "" => default_title(now),
            t => t.to_string(),
        };
        let (parts, values) = Self::sheet(pool, car_id)?;
        if parts.is_empty() {
            return Err(AppError::Validation("the car has no parts to save".into()));
        }
        let garage = garage_track_id(&pool.conn)?;
        let today = now.date_naive();

        let tx = pool.conn.transaction()?;
        write_values(&tx, &values)?;
        let event = match choice {
            EventChoice::Last(id) => {
                let ev = owned_event(&tx, car_id, id)?;
                if ev.track_id != garage {
                    return Err(AppError::Validation(format!(
                        "event #{} is not a garage event",
                        id
                    )));
                }
                ev
            }
            EventChoice::New => insert_event(&tx, car_id, garage, &garage_event_name(now), &today)?,
        };
        let session = insert_session(&tx, event.id, &today, SessionKind::Garage, &title)?;
        replace_snapshot(&tx, session.id, &values)?;
        tx.commit()?;

        ttlog_quiet(
            &pool.conn,
            "setup_save",
            &session.id.to_string(),
            &format!("{} ({} values)", session.name, values.len()),
        );
        Ok((event, session))
    }

    /// Copy a session's snapshot into the car's current values. Entries
    /// of parts that no longer exist are skipped.
    pub fn load_session(pool: &mut DbPool, car_id: i64, session_id: i64) -> AppResult<(Session, usize)> {
        let session = owned_session(&pool.conn, car_id, session_id)?;
        let snapshot = load_snapshot(&pool.conn, session_id)?.ok_or_else(|| {
            AppError::Validation(format!("session #{} has no saved setup", session_id))
        })?;
        let parts = load_sorted(&pool.conn, car_id)?;
        let values: SetupValues = snapshot
            .iter()
            .filter(|(id, _)| parts.iter().any(|p| p.id == *id))
            .map(|(id, v)| (id, v.to_string()))
            .collect();

        let tx = pool.conn.transaction()?;
        write_values(&tx, &values)?;
        tx.commit()?;

        ttlog_quiet(
            &pool.conn,
            "setup_load",
            &session_id.to_string(),
            &format!("{} ({} values)", session.name, values.len()),
        );
        Ok((session, values.len()))
    }

    /// Garage events of the car, newest first, with their sessions.
    pub fn history(pool: &mut DbPool, car_id: i64) -> AppResult<Vec<EventWithSessions>> {
        let garage = garage_track_id(&pool.conn)?;
        events_at_track(&pool.conn, car_id, garage)?
            .into_iter()
            .map(|e| with_sessions(&pool.conn, e))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parts::{PartLogic, PartSpec};
    use crate::db::cars::insert_car;
    use crate::models::location::DisplayLocation;
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 14, 9, 30, 0).unwrap()
    }

    fn add(pool: &mut DbPool, car: i64, name: &str, kind: EntryType) -> i64 {
        let spec = PartSpec {
            name: name.into(),
            unit: String::new(),
            entry_type: kind,
            locations: vec![DisplayLocation::Engine],
            subheading: None,
            order: None,
        };
        PartLogic::add(pool, car, &spec).unwrap()[0].id
    }

    #[test]
    fn titles() {
        assert_eq!(default_title(&now()), "Current Setup at 2025-06-14 09:30:00");
        assert_eq!(
            modified_title("Current Setup at 2025-06-01 10:00:00", &now()),
            "Modified from Current Setup at 2025-06-14 09:30:00"
        );
        assert_eq!(
            modified_title("Baseline", &now()),
            "Modified from Baseline at 2025-06-14 09:30:00"
        );
        assert_eq!(
            modified_title("Modified from Baseline at 2025-06-13 08:00:00", &now()),
            "Modified from Baseline at 2025-06-13 08:00:00"
        );
    }

    #[test]
    fn bump_and_table_respect_entry_types() {
        let mut pool = crate::db::initialize::open_memory().unwrap();
        let car = insert_car(&pool.conn, "Late Model").unwrap().id;
        let jet = add(&mut pool, car, "Jet", EntryType::Number);
        let notes = add(&mut pool, car, "Tires", EntryType::Text);
        let chart = add(&mut pool, car, "Shock curve", EntryType::Table);

        assert_eq!(GarageLogic::bump(&mut pool, car, jet, 1.0).unwrap(), "1");
        assert_eq!(GarageLogic::bump(&mut pool, car, jet, 1.0).unwrap(), "2");
        assert!(GarageLogic::bump(&mut pool, car, notes, 1.0).is_err());

        GarageLogic::table_edit(&mut pool, car, chart, &TableOp::AddColumn).unwrap();
        let t = GarageLogic::table_edit(
            &mut pool,
            car,
            chart,
            &TableOp::SetCell { row: 0, col: 1, text: "12".into() },
        )
        .unwrap();
        assert_eq!(t.headers, vec!["".to_string(), "Header 2".to_string()]);
        assert_eq!(t.rows, vec![vec!["".to_string(), "12".to_string()]]);
        assert!(GarageLogic::table_edit(&mut pool, car, jet, &TableOp::AddRow).is_err());
    }

    #[test]
    fn save_then_load_restores_values() {
        let mut pool = crate::db::initialize::open_memory().unwrap();
        let car = insert_car(&pool.conn, "Late Model").unwrap().id;
        let jet = add(&mut pool, car, "Jet", EntryType::Number);
        GarageLogic::set_value(&mut pool, car, jet, "72").unwrap();

        let (event, session) =
            GarageLogic::save(&mut pool, car, "", EventChoice::New, &now()).unwrap();
        assert_eq!(event.name, "Garage session on 2025-06-14");
        assert_eq!(session.name, "Current Setup at 2025-06-14 09:30:00");
        assert_eq!(session.kind, SessionKind::Garage);

        GarageLogic::set_value(&mut pool, car, jet, "68").unwrap();
        let (_, n) = GarageLogic::load_session(&mut pool, car, session.id).unwrap();
        assert_eq!(n, 1);
        let (_, values) = GarageLogic::sheet(&mut pool, car).unwrap();
        assert_eq!(values.get(jet), Some("72"));

        let (same, second) = GarageLogic::save(
            &mut pool,
            car,
            "Tighter",
            EventChoice::Last(event.id),
            &now(),
        )
        .unwrap();
        assert_eq!(same.id, event.id);
        assert_eq!(second.name, "Tighter");

        let history = GarageLogic::history(&mut pool, car).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sessions.len(), 2);
        assert_eq!(history[0].track, "Garage");
    }

    #[test]
    fn recent_event_window() {
        let mut pool = crate::db::initialize::open_memory().unwrap();
        let car = insert_car(&pool.conn, "Late Model").unwrap().id;
        add(&mut pool, car, "Jet", EntryType::Number);
        let real_now = Local::now();
        let (event, _) =
            GarageLogic::save(&mut pool, car, "", EventChoice::New, &real_now).unwrap();

        let found = GarageLogic::recent_event(&mut pool, car, 24, &Local::now()).unwrap();
        assert_eq!(found.map(|e| e.id), Some(event.id));

        let later = Local::now() + chrono::Duration::hours(30);
        assert!(GarageLogic::recent_event(&mut pool, car, 24, &later).unwrap().is_none());
    }
}
