//! Value of `table` parts: a small grid of strings stored as JSON.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableValue {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Default for TableValue {
    fn default() -> Self {
        Self {
            headers: vec![String::new()],
            rows: vec![vec![String::new()]],
        }
    }
}

impl TableValue {
    /// Parse a stored value; an empty value is a fresh table.
    pub fn parse(raw: &str) -> AppResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw).map_err(|e| AppError::InvalidTable(e.to_string()))
    }

    pub fn to_json(&self) -> String {
        // Serialising plain strings cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn add_column(&mut self) {
        let n = self.headers.len() + 1;
        self.headers.push(format!("Header {n}"));
        for row in &mut self.rows {
            row.push(String::new());
        }
    }

    pub fn add_row(&mut self) {
        self.rows.push(vec![String::new(); self.headers.len()]);
    }

    pub fn delete_column(&mut self, col: usize) -> AppResult<()> {
        if col >= self.headers.len() {
            return Err(AppError::InvalidTable(format!("no column {col}")));
        }
        self.headers.remove(col);
        for row in &mut self.rows {
            if col < row.len() {
                row.remove(col);
            }
        }
        Ok(())
    }

    pub fn delete_row(&mut self, row: usize) -> AppResult<()> {
        if row >= self.rows.len() {
            return Err(AppError::InvalidTable(format!("no row {row}")));
        }
        self.rows.remove(row);
        Ok(())
    }

    pub fn set_header(&mut self, col: usize, text: &str) -> AppResult<()> {
        let h = self
            .headers
            .get_mut(col)
            .ok_or_else(|| AppError::InvalidTable(format!("no column {col}")))?;
        *h = text.to_string();
        Ok(())
    }

    /// Set a cell; writing just past the last row appends a new one.
    pub fn set_cell(&mut self, row: usize, col: usize, text: &str) -> AppResult<()> {
        if col >= self.headers.len() {
            return Err(AppError::InvalidTable(format!("no column {col}")));
        }
        if row == self.rows.len() {
            self.add_row();
        }
        let r = self
            .rows
            .get_mut(row)
            .ok_or_else(|| AppError::InvalidTable(format!("no row {row}")))?;
        if r.len() < self.headers.len() {
            r.resize(self.headers.len(), String::new());
        }
        r[col] = text.to_string();
        Ok(())
    }

    /// The first two columns as (x, y) pairs. Fails when any cell in them
    /// is not a finite number.
    pub fn numeric_series(&self) -> AppResult<Vec<(f64, f64)>> {
        if self.headers.len() < 2 {
            return Err(AppError::InvalidTable(
                "at least two columns are needed".into(),
            ));
        }
        self.rows
            .iter()
            .map(|row| {
                let cell = |i: usize| -> AppResult<f64> {
                    let s = row.get(i).map(String::as_str).unwrap_or("");
                    s.trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|n| n.is_finite())
                        .ok_or_else(|| AppError::InvalidNumber(s.to_string()))
                };
                Ok((cell(0)?, cell(1)?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_is_default_table() {
        let t = TableValue::parse("").unwrap();
        assert_eq!(t.headers, vec![""]);
        assert_eq!(t.rows, vec![vec![""]]);
    }

    #[test]
    fn columns_and_rows_stay_rectangular() {
        let mut t = TableValue::default();
        t.add_column();
        t.add_row();
        assert_eq!(t.headers, vec!["", "Header 2"]);
        assert!(t.rows.iter().all(|r| r.len() == 2));

        t.delete_column(0).unwrap();
        assert_eq!(t.headers, vec!["Header 2"]);
        assert!(t.rows.iter().all(|r| r.len() == 1));
        assert!(t.delete_row(5).is_err());
    }

    #[test]
    fn set_cell_appends_next_row() {
        let mut t = TableValue::default();
        t.set_cell(1, 0, "x").unwrap();
        assert_eq!(t.rows.len(), 2);
        assert!(t.set_cell(5, 0, "y").is_err());
        assert!(t.set_cell(0, 3, "z").is_err());
    }

    #[test]
    fn numeric_series_requires_numbers() {
        let mut t = TableValue::default();
        t.add_column();
        t.set_cell(0, 0, "1").unwrap();
        t.set_cell(0, 1, "2.5").unwrap();
        assert_eq!(t.numeric_series().unwrap(), vec![(1.0, 2.5)]);

        t.set_cell(1, 0, "x").unwrap();
        assert!(t.numeric_series().is_err());

        t.set_cell(1, 0, "2").unwrap();
        t.set_cell(1, 1, "NaN").unwrap();
        assert!(t.numeric_series().is_err());
        t.set_cell(1, 1, "1e400").unwrap();
        assert!(t.numeric_series().is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(TableValue::parse("{\"headers\": 3}").is_err());
    }
}
