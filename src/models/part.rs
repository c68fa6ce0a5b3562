use super::location::DisplayLocation;
use serde::Serialize;

/// Subheading label for parts without one.
pub const OTHERS: &str = "Others";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryType {
    Text,
    Number,
    Table,
}

impl EntryType {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EntryType::Text => "text",
            EntryType::Number => "number",
            EntryType::Table => "table",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "text" => Some(EntryType::Text),
            "number" => Some(EntryType::Number),
            "table" => Some(EntryType::Table),
            _ => None,
        }
    }

    /// Helper: convert input code from CLI (lowercase or uppercase)
    pub fn from_code(code: &str) -> Option<Self> {
        Self::from_db_str(&code.trim().to_lowercase())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Part {
    pub id: i64,
    pub car_id: i64,
    pub name: String,
    pub unit: String,
    pub entry_type: EntryType,
    pub display_location: Option<DisplayLocation>,
    pub subheading: Option<String>,
    pub order: Option<i64>,
}

impl Part {
    /// Subheading as displayed: trimmed, `Others` when blank.
    pub fn subheading_label(&self) -> String {
        match self.subheading.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => OTHERS.to_string(),
        }
    }

    pub fn location_label(&self) -> &'static str {
        self.display_location.map(|l| l.as_str()).unwrap_or("")
    }

    /// A valid order is a positive integer.
    pub fn valid_order(&self) -> Option<i64> {
        self.order.filter(|o| *o > 0)
    }
}

/// Input for creating parts; one row is created per selected location.
#[derive(Debug, Clone)]
pub struct NewPart {
    pub car_id: i64,
    pub name: String,
    pub unit: String,
    pub entry_type: EntryType,
    pub display_location: Option<DisplayLocation>,
    pub subheading: Option<String>,
    pub order: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(sub: Option<&str>) -> Part {
        Part {
            id: 1,
            car_id: 1,
            name: "Spring".into(),
            unit: "Pounds".into(),
            entry_type: EntryType::Number,
            display_location: Some(DisplayLocation::LeftFront),
            subheading: sub.map(String::from),
            order: Some(1),
        }
    }

    #[test]
    fn blank_subheadings_are_others() {
        assert_eq!(part(None).subheading_label(), "Others");
        assert_eq!(part(Some("   ")).subheading_label(), "Others");
        assert_eq!(part(Some(" Shocks ")).subheading_label(), "Shocks");
    }

    #[test]
    fn entry_type_codes() {
        assert_eq!(EntryType::from_code("Number"), Some(EntryType::Number));
        assert_eq!(EntryType::from_code(" table "), Some(EntryType::Table));
        assert_eq!(EntryType::from_code("slider"), None);
    }
}
