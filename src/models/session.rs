use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum SessionKind {
    Garage,
    Track,
}

impl SessionKind {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SessionKind::Garage => "garage",
            SessionKind::Track => "track",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "garage" => Some(SessionKind::Garage),
            "track" => Some(SessionKind::Track),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: i64,
    pub event_id: i64,
    pub date: NaiveDate,
    pub kind: SessionKind,
    pub name: String,
    pub created_at: String,
}

/// A place where a part's values were recorded, reported before the part
/// is deleted.
#[derive(Debug, Clone, Serialize)]
pub struct PartUsage {
    pub session_id: i64,
    pub event: String,
    pub date: NaiveDate,
    pub session: String,
}
