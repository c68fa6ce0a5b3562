//! Setup values keyed by part id, as stored in session snapshots.

use crate::errors::{AppError, AppResult};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupValues(BTreeMap<i64, String>);

impl SetupValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, part_id: i64) -> Option<&str> {
        self.0.get(&part_id).map(String::as_str)
    }

    pub fn contains(&self, part_id: i64) -> bool {
        self.0.contains_key(&part_id)
    }

    pub fn insert(&mut self, part_id: i64, value: impl Into<String>) {
        self.0.insert(part_id, value.into());
    }

    pub fn remove(&mut self, part_id: i64) -> Option<String> {
        self.0.remove(&part_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Parse a snapshot blob. Keys must be part ids; scalar values are
    /// read as their string form and `null` as an empty value.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let parsed: Value = serde_json::from_str(raw)?;
        let Value::Object(map) = parsed else {
            return Err(AppError::Validation(
                "setup snapshot must be a JSON object".into(),
            ));
        };

        let mut out = SetupValues::new();
        for (key, value) in map {
            let id: i64 = key
                .trim()
                .parse()
                .map_err(|_| AppError::Validation(format!("invalid part id in snapshot: {key}")))?;
            let text = match value {
                Value::Null => String::new(),
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => other.to_string(),
            };
            out.insert(id, text);
        }
        Ok(out)
    }

    pub fn to_json(&self) -> String {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        Value::Object(map).to_string()
    }
}

impl FromIterator<(i64, String)> for SetupValues {
    fn from_iter<T: IntoIterator<Item = (i64, String)>>(iter: T) -> Self {
        SetupValues(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_nulls_become_text() {
        let v = SetupValues::from_json(r#"{"3": 12, "4": null, "5": "soft", "6": 1.5}"#).unwrap();
        assert_eq!(v.get(3), Some("12"));
        assert_eq!(v.get(4), Some(""));
        assert!(v.contains(4));
        assert_eq!(v.get(5), Some("soft"));
        assert_eq!(v.get(6), Some("1.5"));
        assert_eq!(v.get(7), None);
    }

    #[test]
    fn rejects_non_objects_and_bad_keys() {
        assert!(SetupValues::from_json("[1,2]").is_err());
        assert!(SetupValues::from_json(r#"{"lf": "1"}"#).is_err());
        assert!(SetupValues::from_json("not json").is_err());
    }

    #[test]
    fn serialised_snapshot_reads_back() {
        let mut v = SetupValues::new();
        v.insert(1, "250");
        v.insert(2, "");
        let again = SetupValues::from_json(&v.to_json()).unwrap();
        assert_eq!(again, v);
    }
}
