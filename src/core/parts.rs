use crate::core::ordering::{
    self, Direction, ensure_unique_order, layout_changes, normalize_orders, sort_parts,
};
use crate::db::log::ttlog_quiet;
use crate::db::parts::{delete_part, get_part, insert_part, load_parts, update_part_layout, update_part_order};
use crate::db::pool::DbPool;
use crate::db::sessions::{part_usage, scrub_part_from_snapshots};
use crate::db::values::ensure_value_row;
use crate::errors::{AppError, AppResult};
use crate::models::location::{DisplayLocation, select_locations};
use crate::models::part::{EntryType, NewPart, Part};
use crate::models::session::PartUsage;
use crate::ui::messages::warning;
use rusqlite::Connection;

/// Everything needed to stage new parts. One part is created per
/// selected location.
#[derive(Debug, Clone)]
pub struct PartSpec {
    pub name: String,
    pub unit: String,
    pub entry_type: EntryType,
    pub locations: Vec<DisplayLocation>,
    pub subheading: Option<String>,
    pub order: Option<i64>,
}

/// High-level business logic for the `part` command.
pub struct PartLogic;

/// Load a car's parts with repaired, persisted orders, sorted for display.
///
/// Persisting the repair is best effort: a failed update is reported and
/// the repaired order is still used for this run.
pub fn load_sorted(conn: &Connection, car_id: i64) -> AppResult<Vec<Part>> {
    let mut parts = load_parts(conn, car_id)?;
    for (id, order) in ensure_unique_order(&mut parts) {
        if let Err(e) = update_part_order(conn, id, order) {
            warning(format!("Could not save repaired order of part #{}: {}", id, e));
        }
    }
    sort_parts(&mut parts);
    Ok(parts)
}

fn owned_part(conn: &Connection, car_id: i64, part_id: i64) -> AppResult<Part> {
    let part = get_part(conn, part_id)?;
    if part.car_id != car_id {
        return Err(AppError::PartNotFound(part_id));
    }
    Ok(part)
}

fn persist_layout(conn: &Connection, before: &[Part], after: &[Part]) -> AppResult<usize> {
    let changed = layout_changes(before, after);
    for p in &changed {
        update_part_layout(conn, p)?;
    }
    Ok(changed.len())
}

impl PartLogic {
    /// Validate and expand a spec into the rows to insert.
    pub fn expand(car_id: i64, spec: &PartSpec, existing: &[Part]) -> AppResult<Vec<NewPart>> {
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("part name is required".into()));
        }
        let locations = select_locations(&spec.locations);
        if locations.is_empty() {
            return Err(AppError::Validation(
                "at least one display location is required".into(),
            ));
        }
        let subheading = spec
            .subheading
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let multi = locations.len() > 1;
        let out = locations
            .iter()
            .map(|loc| {
                let slot = Part {
                    id: 0,
                    car_id,
                    name: String::new(),
                    unit: String::new(),
                    entry_type: spec.entry_type,
                    display_location: Some(*loc),
                    subheading: subheading.clone(),
                    order: None,
                };
                let key = ordering::group_key(&slot);
                let next = existing
                    .iter()
                    .filter(|p| ordering::group_key(p) == key)
                    .filter_map(|p| p.order)
                    .max()
                    .unwrap_or(0)
                    .checked_add(1)
                    .ok_or_else(|| {
                        AppError::Validation(format!("no free order left in {} / {}", key.0, key.1))
                    })?;

                Ok(NewPart {
                    car_id,
                    name: if multi {
                        format!("{} {}", loc.as_str(), name)
                    } else {
                        name.to_string()
                    },
                    unit: spec.unit.trim().to_string(),
                    entry_type: spec.entry_type,
                    display_location: Some(*loc),
                    subheading: subheading.clone(),
                    order: Some(spec.order.unwrap_or(next)),
                })
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(out)
    }

    pub fn add(pool: &mut DbPool, car_id: i64, spec: &PartSpec) -> AppResult<Vec<Part>> {
        let existing = load_sorted(&pool.conn, car_id)?;
        let rows = Self::expand(car_id, spec, &existing)?;

        let tx = pool.conn.transaction()?;
        let mut created = Vec::new();
        for row in &rows {
            let part = insert_part(&tx, row)?;
            ensure_value_row(&tx, part.id)?;
            created.push(part);
        }
        tx.commit()?;

        for p in &created {
            ttlog_quiet(
                &pool.conn,
                "part_add",
                &p.id.to_string(),
                &format!("{} @ {} / {}", p.name, p.location_label(), p.subheading_label()),
            );
        }
        Ok(created)
    }

    pub fn list(pool: &mut DbPool, car_id: i64) -> AppResult<Vec<Part>> {
        load_sorted(&pool.conn, car_id)
    }

    /// Run the order repair for a car; returns the number of parts fixed.
    pub fn repair(pool: &mut DbPool, car_id: i64) -> AppResult<usize> {
        let mut parts = load_parts(&pool.conn, car_id)?;
        let changes = ensure_unique_order(&mut parts);

        let tx = pool.conn.transaction()?;
        for (id, order) in &changes {
            update_part_order(&tx, *id, *order)?;
        }
        tx.commit()?;

        if !changes.is_empty() {
            ttlog_quiet(
                &pool.conn,
                "part_repair",
                &car_id.to_string(),
                &format!("Repaired order of {} part(s)", changes.len()),
            );
        }
        Ok(changes.len())
    }

    /// Apply a layout edit to the car's parts and persist what changed.
    fn edit_layout<F>(pool: &mut DbPool, car_id: i64, op: &str, target: i64, edit: F) -> AppResult<usize>
    where
        F: FnOnce(&mut Vec<Part>) -> AppResult<()>,
    {
        let before = load_sorted(&pool.conn, car_id)?;
        let mut after = before.clone();
        edit(&mut after)?;

        let tx = pool.conn.transaction()?;
        let n = persist_layout(&tx, &before, &after)?;
        tx.commit()?;

        if n > 0 {
            ttlog_quiet(
                &pool.conn,
                op,
                &target.to_string(),
                &format!("{} part(s) rearranged", n),
            );
        }
        Ok(n)
    }

    pub fn move_part(pool: &mut DbPool, car_id: i64, part_id: i64, dir: Direction) -> AppResult<bool> {
        owned_part(&pool.conn, car_id, part_id)?;
        let n = Self::edit_layout(pool, car_id, "part_move", part_id, |parts| {
            ordering::move_within_group(parts, part_id, dir).map(|_| ())
        })?;
        Ok(n > 0)
    }

    pub fn place_before(pool: &mut DbPool, car_id: i64, part_id: i64, target_id: i64) -> AppResult<usize> {
        owned_part(&pool.conn, car_id, part_id)?;
        owned_part(&pool.conn, car_id, target_id)?;
        Self::edit_layout(pool, car_id, "part_place", part_id, |parts| {
            ordering::place_before(parts, part_id, target_id)
        })
    }

    pub fn place_in_group(
        pool: &mut DbPool,
        car_id: i64,
        part_id: i64,
        location: DisplayLocation,
        subheading: Option<String>,
    ) -> AppResult<usize> {
        owned_part(&pool.conn, car_id, part_id)?;
        Self::edit_layout(pool, car_id, "part_place", part_id, |parts| {
            ordering::place_in_group(parts, part_id, Some(location), subheading)
        })
    }

    pub fn rename_subheading(
        pool: &mut DbPool,
        car_id: i64,
        location: DisplayLocation,
        old: &str,
        new: &str,
    ) -> AppResult<usize> {
        let mut renamed = 0;
        Self::edit_layout(pool, car_id, "part_subheading", car_id, |parts| {
            renamed = ordering::rename_subheading(parts, Some(location), old, new);
            if renamed == 0 {
                return Err(AppError::Validation(format!(
                    "no subheading '{}' at {}",
                    old.trim(),
                    location.as_str()
                )));
            }
            normalize_orders(parts);
            Ok(())
        })?;
        Ok(renamed)
    }

    pub fn usage(pool: &mut DbPool, car_id: i64, part_id: i64) -> AppResult<(Part, Vec<PartUsage>)> {
        let part = owned_part(&pool.conn, car_id, part_id)?;
        let usage = part_usage(&pool.conn, car_id, part_id)?;
        Ok((part, usage))
    }

    /// Delete a part, its current value and its entries in every snapshot.
    /// Returns the number of snapshots that lost a value.
    pub fn delete(pool: &mut DbPool, car_id: i64, part_id: i64) -> AppResult<usize> {
        let part = owned_part(&pool.conn, car_id, part_id)?;

        let tx = pool.conn.transaction()?;
        let scrubbed = scrub_part_from_snapshots(&tx, car_id, part_id)?;
        delete_part(&tx, part_id)?;
        tx.commit()?;

        ttlog_quiet(
            &pool.conn,
            "part_del",
            &part_id.to_string(),
            &format!("{} (removed from {} snapshot(s))", part.name, scrubbed),
        );
        Ok(scrubbed)
    }
}
