use crate::db::now_stamp;
use crate::errors::AppResult;
use crate::models::track::{GARAGE_TRACK, Track};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_track(row: &Row) -> rusqlite::Result<Track> {
    Ok(Track {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

/// All tracks except the garage pseudo-track, by name.
pub fn list_tracks(conn: &Connection) -> AppResult<Vec<Track>> {
    let mut stmt = conn.prepare("SELECT id, name FROM tracks WHERE name <> ?1 ORDER BY name ASC")?;
    let rows = stmt.query_map([GARAGE_TRACK], map_track)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_track_by_name(conn: &Connection, name: &str) -> AppResult<Option<Track>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM tracks WHERE name = ?1",
            [name],
            map_track,
        )
        .optional()?)
}

pub fn insert_track(conn: &Connection, name: &str) -> AppResult<Track> {
    conn.execute(
        "INSERT INTO tracks (name, created_at) VALUES (?1, ?2)",
        params![name, now_stamp()],
    )?;
    Ok(Track {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

/// Id of the garage track, recreating the row if it was removed.
pub fn garage_track_id(conn: &Connection) -> AppResult<i64> {
    match find_track_by_name(conn, GARAGE_TRACK)? {
        Some(t) => Ok(t.id),
        None => Ok(insert_track(conn, GARAGE_TRACK)?.id),
    }
}
