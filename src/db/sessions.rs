use crate::db::{date_column, now_stamp};
use crate::errors::{AppError, AppResult};
use crate::models::session::{PartUsage, Session, SessionKind};
use crate::models::setup::SetupValues;
use crate::ui::messages::warning;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_session(row: &Row) -> rusqlite::Result<Session> {
    let date: String = row.get("date")?;
    let kind_str: String = row.get("kind")?;
    let kind = SessionKind::from_db_str(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Validation(format!(
                "invalid session kind: {}",
                kind_str
            ))),
        )
    })?;

    Ok(Session {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        date: date_column(0, date)?,
        kind,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_session(
    conn: &Connection,
    event_id: i64,
    date: &NaiveDate,
    kind: SessionKind,
    name: &str,
) -> AppResult<Session> {
    conn.execute(
        "INSERT INTO sessions (event_id, date, kind, name, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            event_id,
            date.format("%Y-%m-%d").to_string(),
            kind.to_db_str(),
            name,
            now_stamp()
        ],
    )?;
    get_session(conn, conn.last_insert_rowid())
}

pub fn get_session(conn: &Connection, id: i64) -> AppResult<Session> {
    conn.query_row("SELECT * FROM sessions WHERE id = ?1", [id], map_session)
        .optional()?
        .ok_or(AppError::SessionNotFound(id))
}

pub fn list_sessions(conn: &Connection, event_id: i64) -> AppResult<Vec<Session>> {
    let mut stmt = conn.prepare("SELECT * FROM sessions WHERE event_id = ?1 ORDER BY id ASC")?;
    let rows = stmt.query_map([event_id], map_session)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn rename_session(conn: &Connection, id: i64, name: &str) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE sessions SET name = ?1 WHERE id = ?2",
        params![name, id],
    )?;
    if n == 0 {
        return Err(AppError::SessionNotFound(id));
    }
    Ok(())
}

pub fn delete_session(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::SessionNotFound(id));
    }
    Ok(())
}

/// Car id owning a session (through its event).
pub fn session_car_id(conn: &Connection, session_id: i64) -> AppResult<i64> {
    conn.query_row(
        "SELECT e.car_id FROM sessions s JOIN events e ON e.id = s.event_id WHERE s.id = ?1",
        [session_id],
        |r| r.get(0),
    )
    .optional()?
    .ok_or(AppError::SessionNotFound(session_id))
}

pub fn load_snapshot(conn: &Connection, session_id: i64) -> AppResult<Option<SetupValues>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT snapshot FROM session_values WHERE session_id = ?1",
            [session_id],
            |r| r.get(0),
        )
        .optional()?;

    match raw {
        Some(s) => Ok(Some(SetupValues::from_json(&s)?)),
        None => Ok(None),
    }
}

/// Drop any snapshot of the session and store `values` as the new one.
pub fn replace_snapshot(conn: &Connection, session_id: i64, values: &SetupValues) -> AppResult<()> {
    conn.execute(
        "DELETE FROM session_values WHERE session_id = ?1",
        [session_id],
    )?;
    conn.execute(
        "INSERT INTO session_values (session_id, snapshot, created_at) VALUES (?1, ?2, ?3)",
        params![session_id, values.to_json(), now_stamp()],
    )?;
    Ok(())
}

/// Every snapshot of a car's sessions, with the event and session they
/// belong to, ordered by event date and session id.
fn snapshots_for_car(conn: &Connection, car_id: i64) -> AppResult<Vec<(PartUsage, String)>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, e.name, e.date, s.name, v.snapshot
         FROM session_values v
         JOIN sessions s ON s.id = v.session_id
         JOIN events e ON e.id = s.event_id
         WHERE e.car_id = ?1
         ORDER BY e.date ASC, s.id ASC",
    )?;
    let rows = stmt.query_map([car_id], |row| {
        let date: String = row.get(2)?;
        Ok((
            PartUsage {
                session_id: row.get(0)?,
                event: row.get(1)?,
                date: date_column(2, date)?,
                session: row.get(3)?,
            },
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Parse a stored snapshot. An unreadable one is reported and skipped.
fn readable_snapshot(usage: &PartUsage, raw: &str) -> Option<SetupValues> {
    match SetupValues::from_json(raw) {
        Ok(values) => Some(values),
        Err(e) => {
            warning(format!(
                "Skipping unreadable setup of session #{} ({} / {}): {}",
                usage.session_id, usage.event, usage.session, e
            ));
            None
        }
    }
}

/// Sessions whose snapshot records a value for the part.
pub fn part_usage(conn: &Connection, car_id: i64, part_id: i64) -> AppResult<Vec<PartUsage>> {
    let mut out = Vec::new();
    for (usage, raw) in snapshots_for_car(conn, car_id)? {
        if readable_snapshot(&usage, &raw).is_some_and(|v| v.contains(part_id)) {
            out.push(usage);
        }
    }
    Ok(out)
}

/// Remove the part from every snapshot that records it. Returns the
/// number of snapshots rewritten.
pub fn scrub_part_from_snapshots(conn: &Connection, car_id: i64, part_id: i64) -> AppResult<usize> {
    let mut changed = 0;
    for (usage, raw) in snapshots_for_car(conn, car_id)? {
        let Some(mut values) = readable_snapshot(&usage, &raw) else {
            continue;
        };
        if values.remove(part_id).is_some() {
            conn.execute(
                "UPDATE session_values SET snapshot = ?1 WHERE session_id = ?2",
                params![values.to_json(), usage.session_id],
            )?;
            changed += 1;
        }
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::cars::insert_car;
    use crate::db::events::insert_event;
    use crate::db::initialize::open_memory;
    use crate::db::tracks::insert_track;

    fn session_with(conn: &Connection, car_id: i64, raw: &str) -> i64 {
        let date = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        let track = insert_track(conn, &format!("Track {raw}")).unwrap();
        let event = insert_event(conn, car_id, track.id, "Racing", &date).unwrap();
        let session = insert_session(conn, event.id, &date, SessionKind::Track, "Heat").unwrap();
        conn.execute(
            "INSERT INTO session_values (session_id, snapshot, created_at) VALUES (?1, ?2, ?3)",
            params![session.id, raw, now_stamp()],
        )
        .unwrap();
        session.id
    }

    #[test]
    fn unreadable_snapshots_are_skipped() {
        let pool = open_memory().unwrap();
        let car = insert_car(&pool.conn, "Late Model").unwrap();
        let broken = session_with(&pool.conn, car.id, "{not json");
        let good = session_with(&pool.conn, car.id, r#"{"7":"250","8":"3"}"#);

        let used = part_usage(&pool.conn, car.id, 7).unwrap();
        assert_eq!(used.len(), 1);
        assert_eq!(used[0].session_id, good);

        assert_eq!(scrub_part_from_snapshots(&pool.conn, car.id, 7).unwrap(), 1);
        let kept = load_snapshot(&pool.conn, good).unwrap().unwrap();
        assert!(!kept.contains(7));
        assert!(kept.contains(8));

        let raw: String = pool
            .conn
            .query_row(
                "SELECT snapshot FROM session_values WHERE session_id = ?1",
                [broken],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(raw, "{not json");
    }
}
