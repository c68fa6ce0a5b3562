use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
/// Delegates all schema creation / upgrades to the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;
    Ok(())
}

/// Open the configured database, bringing its schema up to date first.
pub fn open_db(path: &str) -> AppResult<DbPool> {
    let pool = DbPool::new(path)?;
    init_db(&pool.conn)?;
    Ok(pool)
}

/// Fresh, migrated in-memory database.
pub fn open_memory() -> AppResult<DbPool> {
    let pool = DbPool::from_conn(Connection::open_in_memory()?)?;
    init_db(&pool.conn)?;
    Ok(pool)
}
