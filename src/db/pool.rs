//! SQLite connection wrapper (lightweight for CLI usage).

use rusqlite::{Connection, Result};
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        Self::from_conn(conn)
    }

    /// Wrap an already opened connection (in-memory databases in tests).
    pub fn from_conn(conn: Connection) -> Result<Self> {
        // Cascade deletes rely on this pragma, which is per connection.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }
}
