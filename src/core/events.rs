use crate::db::events::{delete_event, get_event, rename_event, track_name};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::sessions::{
    delete_session, get_session, insert_session, list_sessions, rename_session, session_car_id,
};
use crate::db::tracks::garage_track_id;
use crate::errors::{AppError, AppResult};
use crate::models::event::{Event, EventWithSessions};
use crate::models::session::{Session, SessionKind};
use rusqlite::Connection;

/// Event and session maintenance shared by the garage and trackside views.
pub struct EventLogic;

fn required_name(name: &str, what: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(format!("{} name is required", what)));
    }
    Ok(name.to_string())
}

/// Load an event, failing unless it belongs to `car_id`.
pub fn owned_event(conn: &Connection, car_id: i64, event_id: i64) -> AppResult<Event> {
    let event = get_event(conn, event_id)?;
    if event.car_id != car_id {
        return Err(AppError::EventNotFound(event_id));
    }
    Ok(event)
}

/// Load a session, failing unless its event belongs to `car_id`.
pub fn owned_session(conn: &Connection, car_id: i64, session_id: i64) -> AppResult<Session> {
    if session_car_id(conn, session_id)? != car_id {
        return Err(AppError::SessionNotFound(session_id));
    }
    get_session(conn, session_id)
}

pub fn with_sessions(conn: &Connection, event: Event) -> AppResult<EventWithSessions> {
    Ok(EventWithSessions {
        track: track_name(conn, event.track_id)?,
        sessions: list_sessions(conn, event.id)?,
        event,
    })
}

impl EventLogic {
    pub fn show(pool: &mut DbPool, car_id: i64, event_id: i64) -> AppResult<EventWithSessions> {
        let event = owned_event(&pool.conn, car_id, event_id)?;
        with_sessions(&pool.conn, event)
    }

    /// Add a session to an event. Garage events get garage sessions.
    pub fn add_session(pool: &mut DbPool, car_id: i64, event_id: i64, name: &str) -> AppResult<Session> {
        let name = required_name(name, "session")?;
        let event = owned_event(&pool.conn, car_id, event_id)?;
        let kind = if event.track_id == garage_track_id(&pool.conn)? {
            SessionKind::Garage
        } else {
            SessionKind::Track
        };

        let session = insert_session(&pool.conn, event.id, &event.date, kind, &name)?;
        ttlog_quiet(
            &pool.conn,
            "session_add",
            &session.id.to_string(),
            &format!("{} ({})", session.name, event.name),
        );
        Ok(session)
    }

    pub fn rename_event(pool: &mut DbPool, car_id: i64, event_id: i64, name: &str) -> AppResult<()> {
        let name = required_name(name, "event")?;
        owned_event(&pool.conn, car_id, event_id)?;
        rename_event(&pool.conn, event_id, &name)?;
        ttlog_quiet(&pool.conn, "event_rename", &event_id.to_string(), &name);
        Ok(())
    }

    /// Delete an event with its sessions and snapshots.
    pub fn delete_event(pool: &mut DbPool, car_id: i64, event_id: i64) -> AppResult<Event> {
        let event = owned_event(&pool.conn, car_id, event_id)?;
        delete_event(&pool.conn, event_id)?;
        ttlog_quiet(&pool.conn, "event_del", &event_id.to_string(), &event.name);
        Ok(event)
    }

    pub fn rename_session(pool: &mut DbPool, car_id: i64, session_id: i64, name: &str) -> AppResult<()> {
        let name = required_name(name, "session")?;
        owned_session(&pool.conn, car_id, session_id)?;
        rename_session(&pool.conn, session_id, &name)?;
        ttlog_quiet(&pool.conn, "session_rename", &session_id.to_string(), &name);
        Ok(())
    }

    pub fn delete_session(pool: &mut DbPool, car_id: i64, session_id: i64) -> AppResult<Session> {
        let session = owned_session(&pool.conn, car_id, session_id)?;
        delete_session(&pool.conn, session_id)?;
        ttlog_quiet(&pool.conn, "session_del", &session_id.to_string(), &session.name);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::cars::insert_car;
    use crate::db::events::insert_event;
    use crate::db::initialize::open_memory;
    use crate::db::sessions::{load_snapshot, replace_snapshot};
    use crate::db::tracks::insert_track;
    use crate::models::setup::SetupValues;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
    }

    #[test]
    fn session_kind_follows_the_track() {
        let mut pool = open_memory().unwrap();
        let car = insert_car(&pool.conn, "Late Model").unwrap();
        let garage = garage_track_id(&pool.conn).unwrap();
        let track = insert_track(&pool.conn, "Eldora").unwrap();

        let g = insert_event(&pool.conn, car.id, garage, "Garage session", &date()).unwrap();
        let t = insert_event(&pool.conn, car.id, track.id, "Dream", &date()).unwrap();

        let s1 = EventLogic::add_session(&mut pool, car.id, g.id, "Baseline").unwrap();
        let s2 = EventLogic::add_session(&mut pool, car.id, t.id, "Hot Laps").unwrap();
        assert_eq!(s1.kind, SessionKind::Garage);
        assert_eq!(s2.kind, SessionKind::Track);
        assert_eq!(s2.date, date());
    }

    #[test]
    fn deleting_an_event_drops_sessions_and_snapshots() {
        let mut pool = open_memory().unwrap();
        let car = insert_car(&pool.conn, "Late Model").unwrap();
        let track = insert_track(&pool.conn, "Eldora").unwrap();
        let ev = insert_event(&pool.conn, car.id, track.id, "Dream", &date()).unwrap();
        let s = EventLogic::add_session(&mut pool, car.id, ev.id, "Feature").unwrap();
        replace_snapshot(&pool.conn, s.id, &SetupValues::new()).unwrap();

        EventLogic::delete_event(&mut pool, car.id, ev.id).unwrap();

        assert!(matches!(
            get_session(&pool.conn, s.id),
            Err(AppError::SessionNotFound(_))
        ));
        assert!(load_snapshot(&pool.conn, s.id).unwrap().is_none());
    }

    #[test]
    fn other_cars_events_are_not_reachable() {
        let mut pool = open_memory().unwrap();
        let a = insert_car(&pool.conn, "A").unwrap();
        let b = insert_car(&pool.conn, "B").unwrap();
        let track = insert_track(&pool.conn, "Knoxville").unwrap();
        let ev = insert_event(&pool.conn, a.id, track.id, "Nationals", &date()).unwrap();

        assert!(EventLogic::rename_event(&mut pool, b.id, ev.id, "Mine").is_err());
        assert!(EventLogic::rename_event(&mut pool, a.id, ev.id, "  ").is_err());
        EventLogic::rename_event(&mut pool, a.id, ev.id, "Knoxville Nationals").unwrap();
        assert_eq!(
            get_event(&pool.conn, ev.id).unwrap().name,
            "Knoxville Nationals"
        );
    }
}
