//! Configuration file checks: detect and fill fields missing from
//! configuration files written by older releases.

use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys every configuration file is expected to carry.
pub const EXPECTED_FIELDS: [&str; 5] = [
    "database",
    "default_car",
    "recent_event_hours",
    "default_sessions",
    "separator_char",
];

fn parse_mapping(content: &str) -> AppResult<Mapping> {
    let yaml: Value = serde_yaml::from_str(content)?;
    match yaml {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(
            "configuration root must be a mapping".into(),
        )),
    }
}

/// Return the expected keys absent from the given YAML document.
pub fn missing_fields(content: &str) -> AppResult<Vec<&'static str>> {
    let map = parse_mapping(content)?;
    Ok(EXPECTED_FIELDS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(Value::String((*k).to_string())))
        .collect())
}

/// Add every missing key with its default value and rewrite the file.
/// Returns the keys that were added.
pub fn fill_missing_fields(path: &Path) -> AppResult<Vec<&'static str>> {
    if !path.exists() {
        return Err(AppError::ConfigLoad);
    }

    let content = fs::read_to_string(path)?;
    let missing = missing_fields(&content)?;
    if missing.is_empty() {
        return Ok(missing);
    }

    let mut map = parse_mapping(&content)?;
    let defaults = serde_yaml::to_value(Config::default())?;

    for key in &missing {
        let k = Value::String((*key).to_string());
        let v = defaults.get(*key).cloned().unwrap_or(Value::Null);
        map.insert(k, v);
    }

    fs::write(path, serde_yaml::to_string(&Value::Mapping(map))?)?;
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn reports_missing_keys_in_declaration_order() {
        let missing = missing_fields("database: a.sqlite\nseparator_char: '='\n").unwrap();
        assert_eq!(
            missing,
            vec!["default_car", "recent_event_hours", "default_sessions"]
        );
    }

    #[test]
    fn empty_document_misses_everything() {
        assert_eq!(missing_fields("").unwrap().len(), EXPECTED_FIELDS.len());
    }

    #[test]
    fn fill_keeps_existing_values() {
        let path = env::temp_dir().join("rsetup_cfg_fill_test.conf");
        fs::write(&path, "database: /tmp/keep.sqlite\nrecent_event_hours: 6\n").unwrap();

        let added = fill_missing_fields(&path).unwrap();
        assert_eq!(added, vec!["default_car", "default_sessions", "separator_char"]);

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.database, "/tmp/keep.sqlite");
        assert_eq!(cfg.recent_event_hours, 6);
        assert_eq!(cfg.default_sessions.len(), 3);

        fs::remove_file(&path).ok();
    }
}
