// ABOUTME: Merge and split edits on grid cells.
// ABOUTME: Grows spans by absorbing empty unit neighbours, shrinks spans, deletes and heals holes.

use crate::cell::{CellId, Footprint};
use crate::error::{BlockReason, ConfirmTarget, Consent, LayoutError};
use crate::partition::GridPartition;
use crate::tracks::Axis;

/// Direction a span can grow or shrink in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Right,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::Down => Axis::Rows,
            Direction::Right => Axis::Columns,
        }
    }
}

/// Which neighbour took over the space of a deleted cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heal {
    Above(CellId),
    Left(CellId),
    /// Nobody could absorb the hole; it stays empty
    Gap,
}

/// The one-unit-thick strip just past `footprint` in `direction`
fn adjacent_line(footprint: &Footprint, direction: Direction) -> Footprint {
    match direction {
        Direction::Down => Footprint::new(footprint.row_end(), footprint.col, 1, footprint.col_span),
        Direction::Right => Footprint::new(footprint.row, footprint.col_end(), footprint.row_span, 1),
    }
}

/// Span edits on a borrowed grid.
///
/// Refused edits return [`LayoutError::Blocked`] and leave the grid untouched.
pub struct SpanMutator<'a> {
    grid: &'a mut GridPartition,
}

impl<'a> SpanMutator<'a> {
    pub fn new(grid: &'a mut GridPartition) -> Self {
        Self { grid }
    }

    /// Cells that growing `anchor` into `line` would absorb.
    ///
    /// Uncovered positions count as free space.
    fn absorbable_in(&self, anchor: &CellId, line: &Footprint) -> Result<Vec<CellId>, BlockReason> {
        if !line.fits(self.grid.rows(), self.grid.cols()) {
            return Err(BlockReason::OutOfBounds);
        }
        let mut absorbed = Vec::new();
        for cell in self.grid.cells() {
            if cell.id() == anchor || !cell.footprint().overlaps(line) {
                continue;
            }
            if cell.is_occupied() {
                return Err(BlockReason::OccupiedNeighbour);
            }
            if !cell.is_unit() {
                return Err(BlockReason::MergedNeighbour);
            }
            absorbed.push(cell.id().clone());
        }
        Ok(absorbed)
    }

    fn check_grow(&self, id: &CellId, direction: Direction) -> Result<Vec<CellId>, LayoutError> {
        let footprint = self.grid.find_cell_by_id(id)?.footprint();
        let line = adjacent_line(&footprint, direction);
        self.absorbable_in(id, &line).map_err(LayoutError::Blocked)
    }

    pub fn can_grow(&self, id: &CellId, direction: Direction) -> bool {
        self.check_grow(id, direction).is_ok()
    }

    /// Extend the span by one, absorbing the empty unit cells in the way
    pub fn grow(&mut self, id: &CellId, direction: Direction) -> Result<(), LayoutError> {
        let absorbed = self.check_grow(id, direction)?;
        self.grid.retain_cells(|c| !absorbed.contains(c.id()));

        let cell = self.grid.cell_mut(id)?;
        match direction {
            Direction::Down => cell.footprint.row_span += 1,
            Direction::Right => cell.footprint.col_span += 1,
        }
        tracing::debug!(cell = %id, ?direction, absorbed = absorbed.len(), "span grown");
        Ok(())
    }

    /// Reduce the span by one. The vacated strip is left uncovered.
    pub fn shrink(&mut self, id: &CellId, direction: Direction) -> Result<(), LayoutError> {
        let cell = self.grid.cell_mut(id)?;
        let span = match direction {
            Direction::Down => &mut cell.footprint.row_span,
            Direction::Right => &mut cell.footprint.col_span,
        };
        if *span <= 1 {
            return Err(LayoutError::Blocked(BlockReason::MinimumSpan));
        }
        *span -= 1;
        tracing::debug!(cell = %id, ?direction, "span shrunk");
        Ok(())
    }

    /// Grow one line at a time until blocked or at the grid edge.
    ///
    /// Each step is kept even if a later one is refused. Returns the number
    /// of lines absorbed, or the reason the very first step was refused.
    pub fn grow_to_edge(&mut self, id: &CellId, direction: Direction) -> Result<u32, LayoutError> {
        let mut steps = 0;
        loop {
            match self.grow(id, direction) {
                Ok(()) => steps += 1,
                Err(LayoutError::Blocked(_)) if steps > 0 => return Ok(steps),
                Err(e) => return Err(e),
            }
        }
    }

    /// Delete a cell and try to let a neighbour take over its area
    pub fn delete_cell(&mut self, id: &CellId, consent: Consent) -> Result<Heal, LayoutError> {
        let cell = self.grid.find_cell_by_id(id)?;
        if cell.is_occupied() && consent == Consent::NotGiven {
            return Err(LayoutError::RequiresConfirmation(ConfirmTarget::Cell(id.clone())));
        }
        let removed = self.grid.take_cell(id)?;
        tracing::debug!(cell = %id, "cell deleted");
        Ok(self.heal_hole(removed.footprint()))
    }

    /// Best-effort fill of an empty area.
    ///
    /// The cell directly above with the same column alignment and width is
    /// tried first, then the cell directly left with the same row alignment
    /// and height. The first one whose expansion is unobstructed and in
    /// bounds absorbs the hole; otherwise the hole stays a gap.
    pub fn heal_hole(&mut self, hole: Footprint) -> Heal {
        if let Some(id) = self.healer_above(&hole) {
            if let Ok(cell) = self.grid.cell_mut(&id) {
                cell.footprint.row_span += hole.row_span;
                tracing::debug!(cell = %id, "hole healed from above");
                return Heal::Above(id);
            }
        }
        if let Some(id) = self.healer_left(&hole) {
            if let Ok(cell) = self.grid.cell_mut(&id) {
                cell.footprint.col_span += hole.col_span;
                tracing::debug!(cell = %id, "hole healed from left");
                return Heal::Left(id);
            }
        }
        tracing::debug!(row = hole.row, col = hole.col, "hole left as gap");
        Heal::Gap
    }

    fn healer_above(&self, hole: &Footprint) -> Option<CellId> {
        let candidate = self.grid.cells().iter().find(|c| {
            let f = c.footprint();
            f.col == hole.col && f.col_span == hole.col_span && f.row_end() == hole.row
        })?;
        let f = candidate.footprint();
        let expansion = Footprint::new(f.row_end(), f.col, hole.row_span, f.col_span);
        self.expansion_is_clear(&expansion, candidate.id())
            .then(|| candidate.id().clone())
    }

    fn healer_left(&self, hole: &Footprint) -> Option<CellId> {
        let candidate = self.grid.cells().iter().find(|c| {
            let f = c.footprint();
            f.row == hole.row && f.row_span == hole.row_span && f.col_end() == hole.col
        })?;
        let f = candidate.footprint();
        let expansion = Footprint::new(f.row, f.col_end(), f.row_span, hole.col_span);
        self.expansion_is_clear(&expansion, candidate.id())
            .then(|| candidate.id().clone())
    }

    fn expansion_is_clear(&self, area: &Footprint, owner: &CellId) -> bool {
        area.fits(self.grid.rows(), self.grid.cols()) && self.grid.region_is_free(area, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Coord;
    use collage_core::PhotoId;

    fn id_at(grid: &GridPartition, row: u32, col: u32) -> CellId {
        grid.find_cell_containing(Coord::new(row, col))
            .unwrap()
            .id()
            .clone()
    }

    #[test]
    fn grow_right_absorbs_neighbour() {
        let mut grid = GridPartition::new(2, 2);
        let anchor = id_at(&grid, 1, 1);
        let neighbour = id_at(&grid, 1, 2);

        grid.spans().grow(&anchor, Direction::Right).unwrap();

        let cell = grid.find_cell_by_id(&anchor).unwrap();
        assert_eq!(cell.col_span(), 2);
        assert_eq!(grid.cells().len(), 3);
        assert!(grid.find_cell_by_id(&neighbour).is_err());
        assert!(grid.is_consistent());
    }

    #[test]
    fn grow_blocked_by_occupied_neighbour() {
        let mut grid = GridPartition::new(2, 2);
        let anchor = id_at(&grid, 1, 1);
        let neighbour = id_at(&grid, 1, 2);
        grid.place_photo(&neighbour, PhotoId::from("p")).unwrap();
        let before = grid.cells().to_vec();

        assert!(!grid.spans().can_grow(&anchor, Direction::Right));
        assert_eq!(
            grid.spans().grow(&anchor, Direction::Right),
            Err(LayoutError::Blocked(BlockReason::OccupiedNeighbour))
        );
        assert_eq!(grid.cells(), &before[..]);
    }

    #[test]
    fn grow_blocked_by_merged_neighbour() {
        let mut grid = GridPartition::new(2, 2);
        let right = id_at(&grid, 1, 2);
        grid.spans().grow(&right, Direction::Down).unwrap();

        let anchor = id_at(&grid, 1, 1);
        assert_eq!(
            grid.spans().grow(&anchor, Direction::Right),
            Err(LayoutError::Blocked(BlockReason::MergedNeighbour))
        );
    }

    #[test]
    fn grow_blocked_at_edge() {
        let mut grid = GridPartition::new(2, 2);
        let anchor = id_at(&grid, 2, 2);
        assert_eq!(
            grid.spans().grow(&anchor, Direction::Down),
            Err(LayoutError::Blocked(BlockReason::OutOfBounds))
        );
    }

    #[test]
    fn grow_wide_cell_down_absorbs_whole_line() {
        let mut grid = GridPartition::new(3, 3);
        let anchor = id_at(&grid, 1, 1);
        grid.spans().grow(&anchor, Direction::Right).unwrap();
        grid.spans().grow(&anchor, Direction::Down).unwrap();

        let cell = grid.find_cell_by_id(&anchor).unwrap();
        assert_eq!((cell.row_span(), cell.col_span()), (2, 2));
        assert_eq!(grid.cells().len(), 9 - 3);
        assert!(grid.is_consistent());
    }

    #[test]
    fn shrink_leaves_gap() {
        let mut grid = GridPartition::new(1, 2);
        let anchor = id_at(&grid, 1, 1);
        grid.spans().grow(&anchor, Direction::Right).unwrap();
        grid.spans().shrink(&anchor, Direction::Right).unwrap();

        assert_eq!(grid.cells().len(), 1);
        assert!(grid.cell_at(Coord::new(1, 2)).is_none());
        assert_eq!(
            grid.spans().shrink(&anchor, Direction::Right),
            Err(LayoutError::Blocked(BlockReason::MinimumSpan))
        );
    }

    #[test]
    fn gap_is_reclaimed_by_growth() {
        let mut grid = GridPartition::new(1, 2);
        let anchor = id_at(&grid, 1, 1);
        grid.spans().grow(&anchor, Direction::Right).unwrap();
        grid.spans().shrink(&anchor, Direction::Right).unwrap();
        grid.spans().grow(&anchor, Direction::Right).unwrap();
        assert_eq!(grid.find_cell_by_id(&anchor).unwrap().col_span(), 2);
    }

    #[test]
    fn grow_to_edge_stops_at_occupied_line() {
        let mut grid = GridPartition::new(5, 1);
        let anchor = id_at(&grid, 1, 1);
        let blocker = id_at(&grid, 4, 1);
        grid.place_photo(&blocker, PhotoId::from("p")).unwrap();

        assert_eq!(grid.spans().grow_to_edge(&anchor, Direction::Down), Ok(2));
        assert_eq!(grid.find_cell_by_id(&anchor).unwrap().row_span(), 3);
        assert!(grid.is_consistent());
    }

    #[test]
    fn grow_to_edge_reaches_boundary() {
        let mut grid = GridPartition::new(2, 4);
        let anchor = id_at(&grid, 2, 2);
        assert_eq!(grid.spans().grow_to_edge(&anchor, Direction::Right), Ok(2));
        assert_eq!(grid.find_cell_by_id(&anchor).unwrap().col_span(), 3);
    }

    #[test]
    fn grow_to_edge_reports_first_block() {
        let mut grid = GridPartition::new(2, 2);
        let anchor = id_at(&grid, 1, 2);
        assert!(grid
            .spans()
            .grow_to_edge(&anchor, Direction::Right)
            .unwrap_err()
            .is_blocked());
    }

    #[test]
    fn delete_heals_from_above() {
        let mut grid = GridPartition::new(3, 1);
        let top = id_at(&grid, 1, 1);
        let middle = id_at(&grid, 2, 1);

        let heal = grid.spans().delete_cell(&middle, Consent::NotGiven).unwrap();

        assert_eq!(heal, Heal::Above(top.clone()));
        assert_eq!(grid.find_cell_by_id(&top).unwrap().row_span(), 2);
        assert_eq!(grid.visible_cells().count(), 2);
        assert!(grid.is_consistent());
    }

    #[test]
    fn delete_heals_from_left_in_first_row() {
        let mut grid = GridPartition::new(1, 3);
        let left = id_at(&grid, 1, 1);
        let middle = id_at(&grid, 1, 2);

        let heal = grid.spans().delete_cell(&middle, Consent::NotGiven).unwrap();
        assert_eq!(heal, Heal::Left(left.clone()));
        assert_eq!(grid.find_cell_by_id(&left).unwrap().col_span(), 2);
    }

    #[test]
    fn delete_prefers_above_over_left() {
        let mut grid = GridPartition::new(2, 2);
        let above = id_at(&grid, 1, 2);
        let target = id_at(&grid, 2, 2);
        assert_eq!(
            grid.spans().delete_cell(&target, Consent::NotGiven),
            Ok(Heal::Above(above))
        );
        assert_eq!(grid.cells().len(), 3);
    }

    #[test]
    fn delete_leaves_gap_when_no_neighbour_fits() {
        let mut grid = GridPartition::new(2, 2);
        let origin = id_at(&grid, 1, 1);
        assert_eq!(
            grid.spans().delete_cell(&origin, Consent::NotGiven),
            Ok(Heal::Gap)
        );
        assert!(grid.cell_at(Coord::new(1, 1)).is_none());
        assert_eq!(grid.cells().len(), 3);
    }

    #[test]
    fn delete_ignores_misaligned_neighbour() {
        let mut grid = GridPartition::new(2, 3);
        let wide = id_at(&grid, 1, 1);
        grid.spans().grow(&wide, Direction::Right).unwrap();

        // Cell (2,2) sits under the wide cell, but the widths differ
        let target = id_at(&grid, 2, 2);
        let left = id_at(&grid, 2, 1);
        assert_eq!(
            grid.spans().delete_cell(&target, Consent::NotGiven),
            Ok(Heal::Left(left))
        );
        assert_eq!(grid.find_cell_by_id(&wide).unwrap().row_span(), 1);
        assert!(grid.is_consistent());
    }

    #[test]
    fn delete_tall_cell_heals_whole_height() {
        let mut grid = GridPartition::new(3, 2);
        let target = id_at(&grid, 2, 2);
        grid.spans().grow(&target, Direction::Down).unwrap();
        let left = id_at(&grid, 2, 1);
        grid.spans().grow(&left, Direction::Down).unwrap();

        let above = id_at(&grid, 1, 2);
        assert_eq!(
            grid.spans().delete_cell(&target, Consent::NotGiven),
            Ok(Heal::Above(above.clone()))
        );
        assert_eq!(grid.find_cell_by_id(&above).unwrap().row_span(), 3);
        assert!(grid.is_consistent());
    }

    #[test]
    fn delete_occupied_cell_needs_consent() {
        let mut grid = GridPartition::new(2, 1);
        let target = id_at(&grid, 2, 1);
        grid.place_photo(&target, PhotoId::from("p")).unwrap();

        assert_eq!(
            grid.spans().delete_cell(&target, Consent::NotGiven),
            Err(LayoutError::RequiresConfirmation(ConfirmTarget::Cell(
                target.clone()
            )))
        );
        assert_eq!(grid.cells().len(), 2);

        grid.spans().delete_cell(&target, Consent::Given).unwrap();
        assert_eq!(grid.cells().len(), 1);
    }
}
