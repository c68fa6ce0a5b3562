//! Car-level current values, one row per part.

use crate::db::now_stamp;
use crate::errors::AppResult;
use crate::models::setup::SetupValues;
use rusqlite::{Connection, params};

/// Current values of every part of a car that has a value row.
pub fn load_current_values(conn: &Connection, car_id: i64) -> AppResult<SetupValues> {
    let mut stmt = conn.prepare(
        "SELECT v.part_id, v.value
         FROM part_values v
         JOIN parts p ON p.id = v.part_id
         WHERE p.car_id = ?1",
    )?;
    let rows = stmt.query_map([car_id], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut out = SetupValues::new();
    for r in rows {
        let (id, v) = r?;
        out.insert(id, v);
    }
    Ok(out)
}

/// Create an empty value row for the part unless one exists.
/// Returns true when a row was created.
pub fn ensure_value_row(conn: &Connection, part_id: i64) -> AppResult<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO part_values (part_id, value, updated_at) VALUES (?1, '', ?2)",
        params![part_id, now_stamp()],
    )?;
    Ok(n > 0)
}

pub fn upsert_value(conn: &Connection, part_id: i64, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO part_values (part_id, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(part_id) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![part_id, value, now_stamp()],
    )?;
    Ok(())
}

/// Write every entry of `values` as a current value.
pub fn write_values(conn: &Connection, values: &SetupValues) -> AppResult<()> {
    for (part_id, value) in values.iter() {
        upsert_value(conn, part_id, value)?;
    }
    Ok(())
}
