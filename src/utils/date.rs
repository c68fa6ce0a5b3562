use chrono::{DateTime, Local, NaiveDate};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Human readable local timestamp used in generated session titles.
pub fn title_stamp(now: &DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// True when an RFC 3339 timestamp falls within the last `hours` hours.
/// Unparsable timestamps are never recent.
pub fn is_within_hours(created_at: &str, now: &DateTime<Local>, hours: i64) -> bool {
    match DateTime::parse_from_rfc3339(created_at) {
        Ok(ts) => {
            let age = now.signed_duration_since(ts);
            age.num_seconds() >= 0 && age.num_hours() < hours
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn parses_iso_dates_only() {
        assert!(parse_date("2025-06-14").is_some());
        assert!(parse_date("14/06/2025").is_none());
        assert!(parse_date("2025-13-01").is_none());
    }

    #[test]
    fn recent_window() {
        let now = Local::now();
        let two_hours_ago = (now - Duration::hours(2)).to_rfc3339();
        let two_days_ago = (now - Duration::hours(48)).to_rfc3339();

        assert!(is_within_hours(&two_hours_ago, &now, 24));
        assert!(!is_within_hours(&two_days_ago, &now, 24));
        assert!(!is_within_hours("yesterday", &now, 24));
    }
}
