use serde::Serialize;

/// Name of the pseudo-track every garage event is attached to.
/// Seeded by the base migration as row id 1.
pub const GARAGE_TRACK: &str = "Garage";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Track {
    pub id: i64,
    pub name: String,
}
