//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Invalid setup snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid display location: {0}")]
    InvalidLocation(String),

    #[error("Invalid entry type: {0}")]
    InvalidEntryType(String),

    #[error("Invalid numeric value: {0}")]
    InvalidNumber(String),

    #[error("Invalid table value: {0}")]
    InvalidTable(String),

    #[error("Invalid assignment '{0}' (expected PART_ID=VALUE)")]
    InvalidAssignment(String),

    // ---------------------------
    // Lookup errors
    // ---------------------------
    #[error("Car #{0} not found")]
    CarNotFound(i64),

    #[error("Part #{0} not found")]
    PartNotFound(i64),

    #[error("Event #{0} not found")]
    EventNotFound(i64),

    #[error("Session #{0} not found")]
    SessionNotFound(i64),

    #[error("No car selected: create one with `rsetup car add <NAME>` or pass --car")]
    NoActiveCar,

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Track name '{0}' is reserved")]
    ReservedTrack(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Failed to load configuration")]
    ConfigLoad,
}

pub type AppResult<T> = Result<T, AppError>;
