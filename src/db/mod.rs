pub mod cars;
pub mod events;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod parts;
pub mod pool;
pub mod sessions;
pub mod stats;
pub mod tracks;
pub mod values;

use crate::errors::AppError;
use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` column, surfacing bad rows as conversion errors.
pub(crate) fn date_column(idx: usize, raw: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(raw.clone())),
        )
    })
}

/// Current local time as stored in `created_at` / `updated_at` columns.
pub(crate) fn now_stamp() -> String {
    chrono::Local::now().to_rfc3339()
}
