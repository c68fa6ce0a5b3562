//! Terminal rendering of setup sheets and event lists.

use crate::core::ordering::group_parts;
use crate::models::event::EventWithSessions;
use crate::models::part::{EntryType, Part};
use crate::models::setup::SetupValues;
use crate::models::table_value::TableValue;
use crate::utils::colors::{CYAN, GREY, RESET, YELLOW};
use crate::utils::formatting::bold;
use crate::utils::table::{Column, Table};

const EMPTY: &str = "--";

/// One-line text of a value as shown in the sheet.
fn cell_text(part: &Part, value: &str) -> String {
    if value.trim().is_empty() {
        return EMPTY.to_string();
    }
    match part.entry_type {
        EntryType::Table => match TableValue::parse(value) {
            Ok(t) => format!("[table {}x{}]", t.rows.len(), t.headers.len()),
            Err(_) => "[invalid table]".to_string(),
        },
        _ if part.unit.is_empty() => value.to_string(),
        _ => format!("{} {}", value, part.unit),
    }
}

fn print_table_value(value: &str, indent: &str) {
    let Ok(t) = TableValue::parse(value) else {
        return;
    };
    let mut table = Table::new(t.headers.iter().map(|h| Column::new(h, 16)).collect());
    for row in &t.rows {
        table.add_row(row.clone());
    }
    for line in table.render().lines() {
        println!("{indent}{line}");
    }
    if let Ok(series) = t.numeric_series()
        && let (Some(first), Some(last)) = (series.first(), series.last())
    {
        println!(
            "{indent}{GREY}{} point(s), {} → {} from {} to {}{RESET}",
            series.len(),
            first.1,
            last.1,
            first.0,
            last.0
        );
    }
}

/// Print the parts grouped by location and subheading with their values.
pub fn print_sheet(parts: &[Part], values: &SetupValues, separator: &str) {
    if parts.is_empty() {
        println!("{GREY}No parts defined for this car.{RESET}");
        return;
    }

    for group in group_parts(parts) {
        println!();
        println!("{}{}{}", CYAN, bold(group.label()), RESET);
        println!("{}", separator.repeat(group.label().chars().count().max(1)));

        for sub in &group.subgroups {
            println!("  {}{}{}", YELLOW, sub.subheading, RESET);

            let mut table = Table::new(vec![
                Column::new("ID", 6),
                Column::new("Part", 28),
                Column::new("Value", 32),
            ]);
            for p in &sub.parts {
                let v = values.get(p.id).unwrap_or("");
                table.add_row(vec![p.id.to_string(), p.name.clone(), cell_text(p, v)]);
            }
            for line in table.render().lines() {
                println!("    {line}");
            }

            for p in sub.parts.iter().filter(|p| p.entry_type == EntryType::Table) {
                let v = values.get(p.id).unwrap_or("");
                if !v.trim().is_empty() {
                    println!("    {}{}:{}", GREY, p.name, RESET);
                    print_table_value(v, "      ");
                }
            }
        }
    }
    println!();
}

/// Print the parts layout (without values): id, order, name, unit, type.
pub fn print_layout(parts: &[Part]) {
    if parts.is_empty() {
        println!("{GREY}No parts defined for this car.{RESET}");
        return;
    }

    for group in group_parts(parts) {
        println!();
        println!("{}{}{}", CYAN, bold(group.label()), RESET);
        for sub in &group.subgroups {
            println!("  {}{}{}", YELLOW, sub.subheading, RESET);
            let mut table = Table::new(vec![
                Column::new("ID", 6),
                Column::new("#", 4),
                Column::new("Part", 28),
                Column::new("Unit", 12),
                Column::new("Type", 8),
            ]);
            for p in &sub.parts {
                table.add_row(vec![
                    p.id.to_string(),
                    p.order.map(|o| o.to_string()).unwrap_or_default(),
                    p.name.clone(),
                    p.unit.clone(),
                    p.entry_type.to_db_str().to_string(),
                ]);
            }
            for line in table.render().lines() {
                println!("    {line}");
            }
        }
    }
    println!();
}

/// Print events with their sessions, one block per event.
pub fn print_events(events: &[EventWithSessions]) {
    if events.is_empty() {
        println!("{GREY}No events found.{RESET}");
        return;
    }

    for e in events {
        println!(
            "{}#{}{} {} {}@ {}{} ({})",
            CYAN,
            e.event.id,
            RESET,
            bold(&e.event.name),
            GREY,
            e.track,
            RESET,
            e.event.date_str()
        );
        if e.sessions.is_empty() {
            println!("    {GREY}(no sessions){RESET}");
        }
        for s in &e.sessions {
            println!("    #{:<5} {}", s.id, s.name);
        }
    }
}
