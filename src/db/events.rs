use crate::db::{date_column, now_stamp};
use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_event(row: &Row) -> rusqlite::Result<Event> {
    let date: String = row.get("date")?;
    Ok(Event {
        id: row.get("id")?,
        car_id: row.get("car_id")?,
        track_id: row.get("track_id")?,
        name: row.get("name")?,
        date: date_column(0, date)?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_event(
    conn: &Connection,
    car_id: i64,
    track_id: i64,
    name: &str,
    date: &NaiveDate,
) -> AppResult<Event> {
    conn.execute(
        "INSERT INTO events (car_id, track_id, name, date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            car_id,
            track_id,
            name,
            date.format("%Y-%m-%d").to_string(),
            now_stamp()
        ],
    )?;
    get_event(conn, conn.last_insert_rowid())
}

pub fn get_event(conn: &Connection, id: i64) -> AppResult<Event> {
    conn.query_row("SELECT * FROM events WHERE id = ?1", [id], map_event)
        .optional()?
        .ok_or(AppError::EventNotFound(id))
}

fn collect(conn: &Connection, sql: &str, car_id: i64, track_id: i64) -> AppResult<Vec<Event>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![car_id, track_id], map_event)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Events of a car at the given track, most recently created first.
pub fn events_at_track(conn: &Connection, car_id: i64, track_id: i64) -> AppResult<Vec<Event>> {
    collect(
        conn,
        "SELECT * FROM events WHERE car_id = ?1 AND track_id = ?2
         ORDER BY created_at DESC, id DESC",
        car_id,
        track_id,
    )
}

/// Events of a car anywhere but the given track, latest date first.
pub fn events_not_at_track(
    conn: &Connection,
    car_id: i64,
    track_id: i64,
) -> AppResult<Vec<Event>> {
    collect(
        conn,
        "SELECT * FROM events WHERE car_id = ?1 AND track_id <> ?2
         ORDER BY date DESC, id DESC",
        car_id,
        track_id,
    )
}

pub fn track_name(conn: &Connection, track_id: i64) -> AppResult<String> {
    Ok(conn
        .query_row("SELECT name FROM tracks WHERE id = ?1", [track_id], |r| {
            r.get(0)
        })
        .optional()?
        .unwrap_or_default())
}

pub fn rename_event(conn: &Connection, id: i64, name: &str) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE events SET name = ?1 WHERE id = ?2",
        params![name, id],
    )?;
    if n == 0 {
        return Err(AppError::EventNotFound(id));
    }
    Ok(())
}

pub fn delete_event(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::EventNotFound(id));
    }
    Ok(())
}
