use crate::db::now_stamp;
use crate::errors::{AppError, AppResult};
use crate::models::car::Car;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_car(row: &Row) -> rusqlite::Result<Car> {
    Ok(Car {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert_car(conn: &Connection, name: &str) -> AppResult<Car> {
    let now = now_stamp();
    conn.execute(
        "INSERT INTO cars (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![name, now],
    )?;
    get_car(conn, conn.last_insert_rowid())
}

pub fn list_cars(conn: &Connection) -> AppResult<Vec<Car>> {
    let mut stmt = conn.prepare("SELECT * FROM cars ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_car)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_car(conn: &Connection, id: i64) -> AppResult<Option<Car>> {
    Ok(conn
        .query_row("SELECT * FROM cars WHERE id = ?1", [id], map_car)
        .optional()?)
}

pub fn get_car(conn: &Connection, id: i64) -> AppResult<Car> {
    find_car(conn, id)?.ok_or(AppError::CarNotFound(id))
}

pub fn rename_car(conn: &Connection, id: i64, name: &str) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE cars SET name = ?1, updated_at = ?2 WHERE id = ?3",
        params![name, now_stamp(), id],
    )?;
    if n == 0 {
        return Err(AppError::CarNotFound(id));
    }
    Ok(())
}

pub fn delete_car(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM cars WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::CarNotFound(id));
    }
    Ok(())
}
