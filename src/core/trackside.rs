//! Race-day workflow: events at real tracks, sessions and the setup
//! submitted for each session.

use crate::core::events::{owned_session, with_sessions};
use crate::core::parts::load_sorted;
use crate::core::resolve::{apply_overrides, resolve_values};
use crate::db::events::{events_not_at_track, insert_event};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::sessions::{insert_session, load_snapshot, replace_snapshot};
use crate::db::tracks::{find_track_by_name, garage_track_id, insert_track, list_tracks};
use crate::db::values::{load_current_values, write_values};
use crate::errors::{AppError, AppResult};
use crate::models::event::EventWithSessions;
use crate::models::part::Part;
use crate::models::session::{Session, SessionKind};
use crate::models::setup::SetupValues;
use crate::models::track::{GARAGE_TRACK, Track};
use chrono::NaiveDate;

/// Input of `trackside new`.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub track: String,
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    /// Replaces the configured default sessions when given.
    pub sessions: Option<Vec<String>>,
    /// Appended after the default (or replacement) sessions.
    pub extra_sessions: Vec<String>,
}

/// A session with everything needed to show or edit its setup.
#[derive(Debug)]
pub struct SessionSheet {
    pub session: Session,
    pub parts: Vec<Part>,
    pub values: SetupValues,
    pub has_snapshot: bool,
}

pub struct TracksideLogic;

/// Session names for a new event: blanks dropped, duplicates collapsed,
/// first spelling kept.
pub fn session_names(defaults: &[String], replace: Option<&[String]>, extra: &[String]) -> Vec<String> {
    let base = replace.unwrap_or(defaults);
    let mut out: Vec<String> = Vec::new();
    for name in base.iter().chain(extra) {
        let name = name.trim();
        if !name.is_empty() && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

impl TracksideLogic {
    pub fn create_event(
        pool: &mut DbPool,
        car_id: i64,
        spec: &NewEvent,
        default_sessions: &[String],
        today: NaiveDate,
    ) -> AppResult<EventWithSessions> {
        let track_name = spec.track.trim();
        if track_name.is_empty() {
            return Err(AppError::Validation("track name is required".into()));
        }
        if track_name.eq_ignore_ascii_case(GARAGE_TRACK) {
            return Err(AppError::ReservedTrack(track_name.to_string()));
        }
        let name = match spec.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("Racing at {}", track_name),
        };
        let date = spec.date.unwrap_or(today);
        let sessions = session_names(default_sessions, spec.sessions.as_deref(), &spec.extra_sessions);

        let tx = pool.conn.transaction()?;
        let track = match find_track_by_name(&tx, track_name)? {
            Some(t) => t,
            None => insert_track(&tx, track_name)?,
        };
        let event = insert_event(&tx, car_id, track.id, &name, &date)?;
        for s in &sessions {
            insert_session(&tx, event.id, &date, SessionKind::Track, s)?;
        }
        tx.commit()?;

        ttlog_quiet(
            &pool.conn,
            "event_add",
            &event.id.to_string(),
            &format!("{} @ {} on {}", event.name, track.name, event.date_str()),
        );
        with_sessions(&pool.conn, event)
    }

    /// Non-garage events of the car, latest date first.
    pub fn list_events(pool: &mut DbPool, car_id: i64) -> AppResult<Vec<EventWithSessions>> {
        let garage = garage_track_id(&pool.conn)?;
        events_not_at_track(&pool.conn, car_id, garage)?
            .into_iter()
            .map(|e| with_sessions(&pool.conn, e))
            .collect()
    }

    /// The car's race event dated `today`, if there is one.
    pub fn today(pool: &mut DbPool, car_id: i64, today: NaiveDate) -> AppResult<Option<EventWithSessions>> {
        Ok(Self::list_events(pool, car_id)?
            .into_iter()
            .find(|e| e.event.date == today))
    }

    /// Values of a session: its snapshot where it has entries, the car's
    /// current values otherwise.
    pub fn session_sheet(pool: &mut DbPool, car_id: i64, session_id: i64) -> AppResult<SessionSheet> {
        let session = owned_session(&pool.conn, car_id, session_id)?;
        let parts = load_sorted(&pool.conn, car_id)?;
        let current = load_current_values(&pool.conn, car_id)?;
        let snapshot = load_snapshot(&pool.conn, session_id)?;
        let values = resolve_values(&parts, &current, snapshot.as_ref());

        Ok(SessionSheet {
            session,
            parts,
            values,
            has_snapshot: snapshot.is_some(),
        })
    }

    /// Submit the setup of a session: the resolved values plus overrides
    /// become the car's current values and the session's only snapshot.
    pub fn submit(
        pool: &mut DbPool,
        car_id: i64,
        session_id: i64,
        overrides: &[(i64, String)],
    ) -> AppResult<SessionSheet> {
        let mut sheet = Self::session_sheet(pool, car_id, session_id)?;
        apply_overrides(&sheet.parts, &mut sheet.values, overrides)?;

        let tx = pool.conn.transaction()?;
        write_values(&tx, &sheet.values)?;
        replace_snapshot(&tx, session_id, &sheet.values)?;
        tx.commit()?;

        ttlog_quiet(
            &pool.conn,
            "setup_submit",
            &session_id.to_string(),
            &format!("{} ({} values)", sheet.session.name, sheet.values.len()),
        );
        sheet.has_snapshot = true;
        Ok(sheet)
    }

    pub fn tracks(pool: &mut DbPool) -> AppResult<Vec<Track>> {
        list_tracks(&pool.conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::garage::GarageLogic;
    use crate::core::parts::{PartLogic, PartSpec};
    use crate::db::cars::insert_car;
    use crate::db::initialize::open_memory;
    use crate::models::location::DisplayLocation;
    use crate::models::part::EntryType;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
    }

    fn defaults() -> Vec<String> {
        vec!["Practice".into(), "Heat".into(), "Feature".into()]
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn session_name_rules() {
        assert_eq!(
            session_names(&defaults(), None, &strings(&["B-Main", " ", "Heat"])),
            strings(&["Practice", "Heat", "Feature", "B-Main"])
        );
        let only = strings(&["Qualifying"]);
        assert_eq!(
            session_names(&defaults(), Some(&only), &[]),
            strings(&["Qualifying"])
        );
    }

    #[test]
    fn garage_is_not_a_race_track() {
        let mut pool = open_memory().unwrap();
        let car = insert_car(&pool.conn, "Sprint").unwrap().id;
        let spec = NewEvent {
            track: "garage".into(),
            ..Default::default()
        };
        assert!(matches!(
            TracksideLogic::create_event(&mut pool, car, &spec, &defaults(), day()),
            Err(AppError::ReservedTrack(_))
        ));
    }

    #[test]
    fn events_default_name_date_and_sessions() {
        let mut pool = open_memory().unwrap();
        let car = insert_car(&pool.conn, "Sprint").unwrap().id;
        let spec = NewEvent {
            track: "Eldora".into(),
            ..Default::default()
        };
        let ev = TracksideLogic::create_event(&mut pool, car, &spec, &defaults(), day()).unwrap();
        assert_eq!(ev.event.name, "Racing at Eldora");
        assert_eq!(ev.event.date, day());
        assert_eq!(ev.track, "Eldora");
        let names: Vec<&str> = ev.sessions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Practice", "Heat", "Feature"]);
        assert!(ev.sessions.iter().all(|s| s.kind == SessionKind::Track));

        // the track is reused by name
        TracksideLogic::create_event(&mut pool, car, &spec, &defaults(), day()).unwrap();
        assert_eq!(TracksideLogic::tracks(&mut pool).unwrap().len(), 1);
        assert!(TracksideLogic::today(&mut pool, car, day()).unwrap().is_some());
    }

    #[test]
    fn submit_replaces_the_snapshot_and_current_values() {
        let mut pool = open_memory().unwrap();
        let car = insert_car(&pool.conn, "Sprint").unwrap().id;
        let spec = PartSpec {
            name: "Wing angle".into(),
            unit: "deg".into(),
            entry_type: EntryType::Number,
            locations: vec![DisplayLocation::TopMiddle],
            subheading: None,
            order: None,
        };
        let wing = PartLogic::add(&mut pool, car, &spec).unwrap()[0].id;
        GarageLogic::set_value(&mut pool, car, wing, "12").unwrap();

        let ev = TracksideLogic::create_event(
            &mut pool,
            car,
            &NewEvent {
                track: "Knoxville".into(),
                ..Default::default()
            },
            &defaults(),
            day(),
        )
        .unwrap();
        let heat = ev.sessions[1].id;

        let before = TracksideLogic::session_sheet(&mut pool, car, heat).unwrap();
        assert!(!before.has_snapshot);
        assert_eq!(before.values.get(wing), Some("12"));

        TracksideLogic::submit(&mut pool, car, heat, &[(wing, "14".into())]).unwrap();
        TracksideLogic::submit(&mut pool, car, heat, &[(wing, "15".into())]).unwrap();

        let rows: i64 = pool
            .conn
            .query_row(
                "SELECT COUNT(*) FROM session_values WHERE session_id = ?1",
                [heat],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(rows, 1);

        let after = TracksideLogic::session_sheet(&mut pool, car, heat).unwrap();
        assert_eq!(after.values.get(wing), Some("15"));
        let (_, current) = GarageLogic::sheet(&mut pool, car).unwrap();
        assert_eq!(current.get(wing), Some("15"));

        assert!(TracksideLogic::submit(&mut pool, car, heat, &[(999, "1".into())]).is_err());
    }
}
