//! Table rendering utilities for CLI outputs.

use unicode_width::UnicodeWidthStr;

pub struct Column {
    pub header: String,
    /// Cells wider than this wrap onto continuation lines.
    pub max_width: usize,
}

impl Column {
    pub fn new(header: &str, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            max_width,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn wrapped(&self, row: &[String]) -> Vec<Vec<String>> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                if cell.is_empty() {
                    return vec![String::new()];
                }
                textwrap::wrap(cell, col.max_width.max(1))
                    .into_iter()
                    .map(|l| l.into_owned())
                    .collect()
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let wrapped_rows: Vec<Vec<Vec<String>>> =
            self.rows.iter().map(|r| self.wrapped(r)).collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                wrapped_rows
                    .iter()
                    .flat_map(|r| r[i].iter())
                    .map(|l| l.width())
                    .chain(std::iter::once(col.header.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();

        // Header
        for (col, w) in self.columns.iter().zip(&widths) {
            out.push_str(&super::formatting::pad_right(&col.header, *w));
            out.push(' ');
        }
        out.push('\n');

        for w in &widths {
            out.push_str(&"-".repeat(*w));
            out.push(' ');
        }
        out.push('\n');

        // Rows
        for row in &wrapped_rows {
            let height = row.iter().map(Vec::len).max().unwrap_or(1);
            for line in 0..height {
                for (cell, w) in row.iter().zip(&widths) {
                    let text = cell.get(line).map(String::as_str).unwrap_or("");
                    out.push_str(&super::formatting::pad_right(text, *w));
                    out.push(' ');
                }
                out.push('\n');
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_fit_widest_cell() {
        let mut t = Table::new(vec![Column::new("ID", 5), Column::new("Name", 20)]);
        t.add_row(vec!["1".into(), "LF Spring".into()]);
        t.add_row(vec!["12".into(), "Rebound".into()]);

        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0].trim_end(), "ID Name");
        assert_eq!(lines[2].trim_end(), "1  LF Spring");
        assert_eq!(lines[3].trim_end(), "12 Rebound");
    }

    #[test]
    fn long_cells_wrap() {
        let mut t = Table::new(vec![Column::new("Note", 10)]);
        t.add_row(vec!["soft on entry, loose on exit".into()]);
        let out = t.render();
        // header + rule + wrapped lines
        assert!(out.lines().count() > 3);
    }
}
