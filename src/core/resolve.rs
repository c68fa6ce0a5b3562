//! Resolution of the values shown for a setup.

use crate::errors::{AppError, AppResult};
use crate::models::part::{EntryType, Part};
use crate::models::setup::SetupValues;
use crate::models::table_value::TableValue;
use crate::utils::formatting::format_number;

/// Value of every part: the snapshot entry when the snapshot has one
/// (even an empty one), else the car's current value, else empty.
pub fn resolve_values(
    parts: &[Part],
    current: &SetupValues,
    snapshot: Option<&SetupValues>,
) -> SetupValues {
    parts
        .iter()
        .map(|p| {
            let v = snapshot
                .and_then(|s| s.get(p.id))
                .or_else(|| current.get(p.id))
                .unwrap_or("");
            (p.id, v.to_string())
        })
        .collect()
}

/// Garage view: the car's current values only.
pub fn current_values(parts: &[Part], current: &SetupValues) -> SetupValues {
    resolve_values(parts, current, None)
}

fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Add `delta` to a numeric value. Empty, non-numeric and non-finite
/// values count as 0.
pub fn bump(value: &str, delta: f64) -> String {
    let base = parse_finite(value).unwrap_or(0.0);
    let bumped = base + delta;
    format_number(if bumped.is_finite() { bumped } else { base })
}

/// Check a value against the part's entry type and return what should be
/// stored.
pub fn validate_value(part: &Part, value: &str) -> AppResult<String> {
    match part.entry_type {
        EntryType::Text => Ok(value.to_string()),
        EntryType::Number => {
            let v = value.trim();
            if v.is_empty() {
                return Ok(String::new());
            }
            let n = parse_finite(v)
                .ok_or_else(|| AppError::InvalidNumber(format!("{} = '{}'", part.name, value)))?;
            Ok(format_number(n))
        }
        EntryType::Table => {
            TableValue::parse(value)?;
            Ok(value.to_string())
        }
    }
}

/// Parse `PART_ID=VALUE` assignments given on the command line.
pub fn parse_assignments(raw: &[String]) -> AppResult<Vec<(i64, String)>> {
    raw.iter()
        .map(|a| {
            let (id, value) = a
                .split_once('=')
                .ok_or_else(|| AppError::InvalidAssignment(a.clone()))?;
            let id: i64 = id
                .trim()
                .parse()
                .map_err(|_| AppError::InvalidAssignment(a.clone()))?;
            Ok((id, value.to_string()))
        })
        .collect()
}

/// Apply validated overrides on top of `values`. Every id must be one of
/// `parts`.
pub fn apply_overrides(
    parts: &[Part],
    values: &mut SetupValues,
    overrides: &[(i64, String)],
) -> AppResult<()> {
    for (id, value) in overrides {
        let part = parts
            .iter()
            .find(|p| p.id == *id)
            .ok_or(AppError::PartNotFound(*id))?;
        values.insert(*id, validate_value(part, value)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::location::DisplayLocation;

    fn part(id: i64, kind: EntryType) -> Part {
        Part {
            id,
            car_id: 1,
            name: format!("p{id}"),
            unit: String::new(),
            entry_type: kind,
            display_location: Some(DisplayLocation::Engine),
            subheading: None,
            order: Some(id),
        }
    }

    #[test]
    fn snapshot_then_current_then_empty() {
        let parts = vec![
            part(1, EntryType::Text),
            part(2, EntryType::Text),
            part(3, EntryType::Text),
        ];
        let mut current = SetupValues::new();
        current.insert(1, "cur1");
        current.insert(2, "cur2");
        let mut snap = SetupValues::new();
        snap.insert(1, "snap1");

        let v = resolve_values(&parts, &current, Some(&snap));
        assert_eq!(v.get(1), Some("snap1"));
        assert_eq!(v.get(2), Some("cur2"));
        assert_eq!(v.get(3), Some(""));
    }

    #[test]
    fn empty_snapshot_entry_still_wins() {
        let parts = vec![part(1, EntryType::Text)];
        let mut current = SetupValues::new();
        current.insert(1, "cur");
        let mut snap = SetupValues::new();
        snap.insert(1, "");

        let v = resolve_values(&parts, &current, Some(&snap));
        assert_eq!(v.get(1), Some(""));
    }

    #[test]
    fn values_of_unknown_parts_are_dropped() {
        let parts = vec![part(1, EntryType::Text)];
        let mut snap = SetupValues::new();
        snap.insert(42, "stale");
        let v = resolve_values(&parts, &SetupValues::new(), Some(&snap));
        assert_eq!(v.len(), 1);
        assert!(!v.contains(42));
    }

    #[test]
    fn bump_counts_blank_as_zero() {
        assert_eq!(bump("", 1.0), "1");
        assert_eq!(bump("12", -1.0), "11");
        assert_eq!(bump("2.5", 1.0), "3.5");
        assert_eq!(bump("soft", 1.0), "1");
        assert_eq!(bump("NaN", 1.0), "1");
        assert_eq!(bump("inf", -1.0), "-1");
    }

    #[test]
    fn number_parts_validate() {
        let p = part(1, EntryType::Number);
        assert_eq!(validate_value(&p, " 250 ").unwrap(), "250");
        assert_eq!(validate_value(&p, "").unwrap(), "");
        assert!(validate_value(&p, "stiff").is_err());
        for v in ["NaN", "inf", "-infinity", "1e400"] {
            assert!(validate_value(&p, v).is_err(), "{v} should be rejected");
        }
    }

    #[test]
    fn assignments_parse() {
        let a = parse_assignments(&["3=250".into(), "4=soft=ish".into()]).unwrap();
        assert_eq!(a, vec![(3, "250".to_string()), (4, "soft=ish".to_string())]);
        assert!(parse_assignments(&["lf=3".into()]).is_err());
        assert!(parse_assignments(&["3".into()]).is_err());
    }
}
