// ABOUTME: Grid cells and their rectangular footprints.
// ABOUTME: Coordinates are 1-based; a footprint covers [row, row+span) x [col, col+span).

use collage_core::Placement;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub String);

impl CellId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CellId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A grid position (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: u32,
    pub col: u32,
}

impl Coord {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Axis-aligned rectangle of grid positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Footprint {
    pub row: u32,
    pub col: u32,
    pub row_span: u32,
    pub col_span: u32,
}

impl Footprint {
    pub const fn new(row: u32, col: u32, row_span: u32, col_span: u32) -> Self {
        Self {
            row,
            col,
            row_span,
            col_span,
        }
    }

    pub const fn unit(row: u32, col: u32) -> Self {
        Self::new(row, col, 1, 1)
    }

    pub fn origin(&self) -> Coord {
        Coord::new(self.row, self.col)
    }

    /// First row past the footprint
    pub fn row_end(&self) -> u32 {
        self.row.saturating_add(self.row_span)
    }

    /// First column past the footprint
    pub fn col_end(&self) -> u32 {
        self.col.saturating_add(self.col_span)
    }

    pub fn contains(&self, at: Coord) -> bool {
        at.row >= self.row && at.row < self.row_end() && at.col >= self.col && at.col < self.col_end()
    }

    pub fn overlaps(&self, other: &Footprint) -> bool {
        self.row < other.row_end()
            && other.row < self.row_end()
            && self.col < other.col_end()
            && other.col < self.col_end()
    }

    /// True if the footprint lies within a `rows` x `cols` grid
    pub fn fits(&self, rows: u32, cols: u32) -> bool {
        self.row >= 1
            && self.col >= 1
            && self.row_span >= 1
            && self.col_span >= 1
            && u64::from(self.row) + u64::from(self.row_span) <= u64::from(rows) + 1
            && u64::from(self.col) + u64::from(self.col_span) <= u64::from(cols) + 1
    }
}

/// One rectangle of the collage. Cells are owned by the grid partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub(crate) id: CellId,
    pub(crate) footprint: Footprint,
    pub(crate) occupant: Option<Placement>,
}

impl Cell {
    pub(crate) fn new(id: CellId, footprint: Footprint) -> Self {
        Self {
            id,
            footprint,
            occupant: None,
        }
    }

    pub fn id(&self) -> &CellId {
        &self.id
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    pub fn row(&self) -> u32 {
        self.footprint.row
    }

    pub fn col(&self) -> u32 {
        self.footprint.col
    }

    pub fn row_span(&self) -> u32 {
        self.footprint.row_span
    }

    pub fn col_span(&self) -> u32 {
        self.footprint.col_span
    }

    pub fn occupant(&self) -> Option<&Placement> {
        self.occupant.as_ref()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn is_unit(&self) -> bool {
        self.footprint.row_span == 1 && self.footprint.col_span == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_contains_is_half_open() {
        let f = Footprint::new(2, 3, 2, 1);
        assert!(f.contains(Coord::new(2, 3)));
        assert!(f.contains(Coord::new(3, 3)));
        assert!(!f.contains(Coord::new(4, 3)));
        assert!(!f.contains(Coord::new(2, 4)));
    }

    #[test]
    fn adjacent_footprints_do_not_overlap() {
        let a = Footprint::new(1, 1, 2, 2);
        assert!(!a.overlaps(&Footprint::unit(1, 3)));
        assert!(!a.overlaps(&Footprint::unit(3, 1)));
        assert!(a.overlaps(&Footprint::new(2, 2, 3, 3)));
    }

    #[test]
    fn fits_checks_far_edge() {
        assert!(Footprint::new(1, 1, 3, 3).fits(3, 3));
        assert!(!Footprint::new(2, 1, 3, 1).fits(3, 3));
        assert!(!Footprint::new(0, 1, 1, 1).fits(3, 3));
        assert!(!Footprint::new(1, 1, 0, 1).fits(3, 3));
    }

    #[test]
    fn fits_rejects_positions_near_u32_max() {
        assert!(!Footprint::unit(u32::MAX, 1).fits(2, 2));
        assert!(!Footprint::new(1, 1, u32::MAX, 1).fits(2, 2));
        assert!(!Footprint::new(2, 2, 1, u32::MAX).fits(u32::MAX, u32::MAX));
        assert!(Footprint::unit(u32::MAX, 1).fits(u32::MAX, 1));
        assert_eq!(Footprint::unit(u32::MAX, 1).row_end(), u32::MAX);
    }
}
