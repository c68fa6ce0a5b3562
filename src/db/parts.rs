use crate::db::now_stamp;
use crate::errors::{AppError, AppResult};
use crate::models::location::DisplayLocation;
use crate::models::part::{EntryType, NewPart, Part};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_part(row: &Row) -> rusqlite::Result<Part> {
    let kind_str: String = row.get("entry_type")?;
    let entry_type = EntryType::from_db_str(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidEntryType(kind_str.clone())),
        )
    })?;

    let loc_str: Option<String> = row.get("display_location")?;
    let display_location = match loc_str.as_deref() {
        None | Some("") => None,
        Some(s) => Some(DisplayLocation::from_db_str(s).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidLocation(s.to_string())),
            )
        })?),
    };

    Ok(Part {
        id: row.get("id")?,
        car_id: row.get("car_id")?,
        name: row.get("name")?,
        unit: row.get("unit")?,
        entry_type,
        display_location,
        subheading: row.get("subheading")?,
        order: row.get("sort_order")?,
    })
}

pub fn insert_part(conn: &Connection, p: &NewPart) -> AppResult<Part> {
    let now = now_stamp();
    conn.execute(
        "INSERT INTO parts (car_id, name, unit, entry_type, display_location, subheading, sort_order, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            p.car_id,
            p.name,
            p.unit,
            p.entry_type.to_db_str(),
            p.display_location.map(|l| l.to_db_str()),
            p.subheading,
            p.order,
            now,
        ],
    )?;
    get_part(conn, conn.last_insert_rowid())
}

/// Parts of a car in insertion order.
pub fn load_parts(conn: &Connection, car_id: i64) -> AppResult<Vec<Part>> {
    let mut stmt = conn.prepare("SELECT * FROM parts WHERE car_id = ?1 ORDER BY id ASC")?;
    let rows = stmt.query_map([car_id], map_part)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_part(conn: &Connection, id: i64) -> AppResult<Part> {
    conn.query_row("SELECT * FROM parts WHERE id = ?1", [id], map_part)
        .optional()?
        .ok_or(AppError::PartNotFound(id))
}

pub fn update_part_order(conn: &Connection, id: i64, order: i64) -> AppResult<()> {
    conn.execute(
        "UPDATE parts SET sort_order = ?1, updated_at = ?2 WHERE id = ?3",
        params![order, now_stamp(), id],
    )?;
    Ok(())
}

/// Persist the layout fields of a part (location, subheading, order).
pub fn update_part_layout(conn: &Connection, p: &Part) -> AppResult<()> {
    conn.execute(
        "UPDATE parts
         SET display_location = ?1, subheading = ?2, sort_order = ?3, updated_at = ?4
         WHERE id = ?5",
        params![
            p.display_location.map(|l| l.to_db_str()),
            p.subheading,
            p.order,
            now_stamp(),
            p.id,
        ],
    )?;
    Ok(())
}

pub fn delete_part(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM parts WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::PartNotFound(id));
    }
    Ok(())
}
