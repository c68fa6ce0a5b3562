use super::session::Session;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: i64,
    pub car_id: i64,
    pub track_id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub created_at: String,
}

impl Event {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// An event together with its track name and sessions, as listed by the
/// garage and trackside views.
#[derive(Debug, Clone, Serialize)]
pub struct EventWithSessions {
    pub event: Event,
    pub track: String,
    pub sessions: Vec<Session>,
}
