//! Ordering and grouping of parts on the setup sheet.
//!
//! Parts are grouped by `(display location, subheading)`. Inside a group
//! the `order` field decides the display sequence and should be a
//! distinct positive integer; nothing enforces that at write time, so
//! [`ensure_unique_order`] repairs it whenever parts are loaded.

use crate::errors::{AppError, AppResult};
use crate::models::location::DisplayLocation;
use crate::models::part::Part;
use std::collections::{HashMap, HashSet};

pub type GroupKey = (String, String);

pub fn group_key(p: &Part) -> GroupKey {
    (p.location_label().to_string(), p.subheading_label())
}

/// Give every part with a missing, non-positive or duplicate order the
/// lowest positive integer not yet used in its group. Parts are scanned
/// in slice order and the first holder of an order keeps it.
///
/// Returns `(part_id, new_order)` for every part that changed.
pub fn ensure_unique_order(parts: &mut [Part]) -> Vec<(i64, i64)> {
    let mut used: HashMap<GroupKey, HashSet<i64>> = HashMap::new();
    let mut needs_fix = vec![false; parts.len()];

    for (i, p) in parts.iter().enumerate() {
        let set = used.entry(group_key(p)).or_default();
        match p.valid_order() {
            Some(o) if set.insert(o) => {}
            _ => needs_fix[i] = true,
        }
    }

    let mut changes = Vec::new();
    for (p, fix) in parts.iter_mut().zip(needs_fix) {
        if !fix {
            continue;
        }
        let set = used.entry(group_key(p)).or_default();
        let mut candidate = 1;
        while set.contains(&candidate) {
            candidate += 1;
        }
        set.insert(candidate);
        p.order = Some(candidate);
        changes.push((p.id, candidate));
    }

    changes
}

/// Stable sort by order; parts without one go last.
pub fn sort_parts(parts: &mut [Part]) {
    parts.sort_by_key(|p| p.order.unwrap_or(i64::MAX));
}

#[derive(Debug)]
pub struct SubGroup<'a> {
    pub subheading: String,
    pub parts: Vec<&'a Part>,
}

#[derive(Debug)]
pub struct LocationGroup<'a> {
    pub location: Option<DisplayLocation>,
    pub subgroups: Vec<SubGroup<'a>>,
}

impl LocationGroup<'_> {
    pub fn label(&self) -> &'static str {
        self.location.map(|l| l.as_str()).unwrap_or("(unplaced)")
    }
}

/// Group parts by location (grid order, unplaced last) and subheading
/// (first appearance). Parts keep their relative order.
pub fn group_parts(parts: &[Part]) -> Vec<LocationGroup<'_>> {
    let mut groups: Vec<LocationGroup<'_>> = Vec::new();

    for p in parts {
        let idx = match groups.iter().position(|g| g.location == p.display_location) {
            Some(i) => i,
            None => {
                groups.push(LocationGroup {
                    location: p.display_location,
                    subgroups: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let sub = p.subheading_label();
        let group = &mut groups[idx];
        match group.subgroups.iter_mut().find(|s| s.subheading == sub) {
            Some(s) => s.parts.push(p),
            None => group.subgroups.push(SubGroup {
                subheading: sub,
                parts: vec![p],
            }),
        }
    }

    groups.sort_by_key(|g| g.location.map(|l| l.grid_index()).unwrap_or(usize::MAX));
    groups
}

/// Indices of the parts in `key`'s group, sorted by (order, position).
fn group_indices(parts: &[Part], key: &GroupKey) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..parts.len())
        .filter(|i| &group_key(&parts[*i]) == key)
        .collect();
    idx.sort_by_key(|i| (parts[*i].order.unwrap_or(i64::MAX), *i));
    idx
}

/// Renumber every group 1..n following the current order.
pub fn normalize_orders(parts: &mut [Part]) {
    let keys: Vec<GroupKey> = {
        let mut seen = HashSet::new();
        parts
            .iter()
            .map(group_key)
            .filter(|k| seen.insert(k.clone()))
            .collect()
    };

    for key in keys {
        for (n, i) in group_indices(parts, &key).into_iter().enumerate() {
            parts[i].order = Some(n as i64 + 1);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

fn index_of(parts: &[Part], id: i64) -> AppResult<usize> {
    parts
        .iter()
        .position(|p| p.id == id)
        .ok_or(AppError::PartNotFound(id))
}

/// Swap a part's order with its neighbour inside its group.
/// Returns false when the part is already first (up) or last (down).
pub fn move_within_group(parts: &mut [Part], id: i64, dir: Direction) -> AppResult<bool> {
    let at = index_of(parts, id)?;
    let members = group_indices(parts, &group_key(&parts[at]));
    let pos = members.iter().position(|i| *i == at).unwrap_or(0);

    let other = match dir {
        Direction::Up if pos > 0 => members[pos - 1],
        Direction::Down if pos + 1 < members.len() => members[pos + 1],
        _ => return Ok(false),
    };

    let a = parts[at].order;
    parts[at].order = parts[other].order;
    parts[other].order = a;
    Ok(true)
}

/// Move a part in front of `target_id`: it takes the target's location,
/// subheading and order, and the target and everything after it in that
/// group shift down by one. Groups are renumbered afterwards.
pub fn place_before(parts: &mut [Part], id: i64, target_id: i64) -> AppResult<()> {
    if id == target_id {
        return Ok(());
    }
    let at = index_of(parts, id)?;
    let target = parts[index_of(parts, target_id)?].clone();
    let target_key = group_key(&target);
    let target_order = target.order.unwrap_or(i64::MAX);

    for (i, p) in parts.iter_mut().enumerate() {
        if i == at {
            continue;
        }
        if group_key(p) == target_key && p.order.unwrap_or(i64::MAX) >= target_order {
            p.order = p.order.map(|o| o.saturating_add(1));
        }
    }

    let moved = &mut parts[at];
    moved.display_location = target.display_location;
    moved.subheading = target.subheading.clone();
    moved.order = target.order;

    normalize_orders(parts);
    Ok(())
}

/// Move a part into another group, keeping its order value; groups are
/// renumbered afterwards.
pub fn place_in_group(
    parts: &mut [Part],
    id: i64,
    location: Option<DisplayLocation>,
    subheading: Option<String>,
) -> AppResult<()> {
    let at = index_of(parts, id)?;
    let p = &mut parts[at];
    p.display_location = location;
    p.subheading = subheading.filter(|s| !s.trim().is_empty());
    normalize_orders(parts);
    Ok(())
}

/// Rename a subheading inside one location. Returns how many parts moved.
pub fn rename_subheading(
    parts: &mut [Part],
    location: Option<DisplayLocation>,
    old: &str,
    new: &str,
) -> usize {
    let old = old.trim();
    let new = new.trim();
    let mut n = 0;
    for p in parts.iter_mut() {
        if p.display_location == location && p.subheading_label() == old {
            p.subheading = if new.is_empty() {
                None
            } else {
                Some(new.to_string())
            };
            n += 1;
        }
    }
    n
}

/// Parts whose layout (location, subheading, order) differs from `before`.
pub fn layout_changes<'a>(before: &[Part], after: &'a [Part]) -> Vec<&'a Part> {
    after
        .iter()
        .filter(|p| match before.iter().find(|b| b.id == p.id) {
            Some(b) => {
                b.display_location != p.display_location
                    || b.subheading != p.subheading
                    || b.order != p.order
            }
            None => true,
        })
        .collect()
}
