use serde::Serialize;

/// One cell of the 5×3 setup sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DisplayLocation {
    TopLeft,
    TopMiddle,
    TopRight,
    LeftFront,
    Engine,
    RightFront,
    Driver,
    Center,
    Passenger,
    LeftRear,
    Differential,
    RightRear,
    BottomLeft,
    BottomMiddle,
    BottomRight,
}

use DisplayLocation::*;

impl DisplayLocation {
    /// Row-major layout of the setup sheet.
    pub const GRID: [[DisplayLocation; 3]; 5] = [
        [TopLeft, TopMiddle, TopRight],
        [LeftFront, Engine, RightFront],
        [Driver, Center, Passenger],
        [LeftRear, Differential, RightRear],
        [BottomLeft, BottomMiddle, BottomRight],
    ];

    pub const CORNERS: [DisplayLocation; 4] = [LeftFront, RightFront, LeftRear, RightRear];

    pub fn all() -> impl Iterator<Item = DisplayLocation> {
        Self::GRID.into_iter().flatten()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TopLeft => "Top Left",
            TopMiddle => "Top Middle",
            TopRight => "Top Right",
            LeftFront => "LF",
            Engine => "Engine",
            RightFront => "RF",
            Driver => "Driver",
            Center => "Center",
            Passenger => "Passenger",
            LeftRear => "LR",
            Differential => "Differential",
            RightRear => "RR",
            BottomLeft => "Bottom Left",
            BottomMiddle => "Bottom Middle",
            BottomRight => "Bottom Right",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.as_str()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::all().find(|l| l.as_str() == s)
    }

    /// Helper: convert input code from CLI. Case and separators are
    /// ignored, so `top-left`, `TopLeft` and `"top left"` all match.
    pub fn from_code(code: &str) -> Option<Self> {
        let norm = |s: &str| -> String {
            s.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        };
        let wanted = norm(code);
        if wanted.is_empty() {
            return None;
        }
        Self::all().find(|l| norm(l.as_str()) == wanted)
    }

    pub fn is_corner(&self) -> bool {
        Self::CORNERS.contains(self)
    }

    /// Position in the grid, used to order grouped output.
    pub fn grid_index(&self) -> usize {
        Self::all().position(|l| l == *self).unwrap_or(usize::MAX)
    }
}

/// Apply the selection rule used when picking locations for new parts:
/// corners combine with each other, any other cell is exclusive.
pub fn select_locations(codes: &[DisplayLocation]) -> Vec<DisplayLocation> {
    let mut out: Vec<DisplayLocation> = Vec::new();
    for loc in codes {
        if loc.is_corner() {
            out.retain(|l| l.is_corner());
            if !out.contains(loc) {
                out.push(*loc);
            }
        } else {
            out = vec![*loc];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_lenient() {
        assert_eq!(DisplayLocation::from_code("lf"), Some(LeftFront));
        assert_eq!(DisplayLocation::from_code("top-left"), Some(TopLeft));
        assert_eq!(DisplayLocation::from_code("Bottom Middle"), Some(BottomMiddle));
        assert_eq!(DisplayLocation::from_code("trunk"), None);
        assert_eq!(DisplayLocation::from_code(""), None);
    }

    #[test]
    fn db_round_trip_uses_canonical_names() {
        for loc in DisplayLocation::all() {
            assert_eq!(DisplayLocation::from_db_str(loc.to_db_str()), Some(loc));
        }
        assert_eq!(DisplayLocation::from_db_str("lf"), None);
    }

    #[test]
    fn grid_has_fifteen_cells_in_order() {
        let all: Vec<_> = DisplayLocation::all().collect();
        assert_eq!(all.len(), 15);
        assert_eq!(all[3], LeftFront);
        assert_eq!(RightRear.grid_index(), 11);
    }

    #[test]
    fn corners_combine_and_others_replace() {
        assert_eq!(
            select_locations(&[LeftFront, RightFront, LeftFront]),
            vec![LeftFront, RightFront]
        );
        assert_eq!(select_locations(&[LeftFront, Engine]), vec![Engine]);
        assert_eq!(select_locations(&[Engine, LeftRear]), vec![LeftRear]);
        assert_eq!(select_locations(&[Engine, Driver]), vec![Driver]);
    }
}
