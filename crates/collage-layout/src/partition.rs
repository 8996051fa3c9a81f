// ABOUTME: The authoritative set of cells tiling the collage grid.
// ABOUTME: Keeps cells non-overlapping and in bounds; answers occupancy and visibility queries.

use collage_core::{PhotoId, Placement};

use crate::cell::{Cell, CellId, Coord, Footprint};
use crate::error::{BlockReason, ConfirmTarget, Consent, LayoutError};
use crate::mutator::SpanMutator;
use crate::tracks::{Axis, TrackSizer, MAX_TRACKS};

/// A `rows` x `cols` grid covered by non-overlapping rectangular cells.
///
/// Positions may be left uncovered after a deletion that could not be healed
/// or after a shrink; such gaps render as empty space.
#[derive(Debug, Clone)]
pub struct GridPartition {
    rows: u32,
    cols: u32,
    cells: Vec<Cell>,
    tracks: TrackSizer,
    next_id: u64,
}

impl GridPartition {
    pub fn new(rows: u32, cols: u32) -> Self {
        let mut grid = Self {
            rows: 1,
            cols: 1,
            cells: Vec::new(),
            tracks: TrackSizer::uniform(1, 1),
            next_id: 0,
        };
        grid.initialize(rows, cols);
        grid
    }

    /// Assemble a partition from already validated parts
    pub(crate) fn from_parts(rows: u32, cols: u32, tracks: TrackSizer, cells: Vec<Cell>) -> Self {
        let next_id = cells
            .iter()
            .filter_map(|c| c.id.as_str().strip_prefix("cell-")?.parse::<u64>().ok())
            .max()
            .map_or(0, |n| n + 1);
        Self {
            rows,
            cols,
            cells,
            tracks,
            next_id,
        }
    }

    /// Replace everything with `rows * cols` empty unit cells and uniform tracks.
    /// Each dimension is clamped to `1..=MAX_TRACKS`.
    pub fn initialize(&mut self, rows: u32, cols: u32) {
        self.rows = rows.clamp(1, MAX_TRACKS);
        self.cols = cols.clamp(1, MAX_TRACKS);
        self.tracks = TrackSizer::uniform(self.rows, self.cols);
        self.cells.clear();
        self.next_id = 0;
        for row in 1..=self.rows {
            for col in 1..=self.cols {
                self.push_unit(row, col);
            }
        }
        tracing::debug!(rows = self.rows, cols = self.cols, "grid initialized");
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn dimension(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Rows => self.rows,
            Axis::Columns => self.cols,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn tracks(&self) -> &TrackSizer {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut TrackSizer {
        &mut self.tracks
    }

    /// Span editing for this grid
    pub fn spans(&mut self) -> SpanMutator<'_> {
        SpanMutator::new(self)
    }

    pub(crate) fn fresh_id(&mut self) -> CellId {
        loop {
            let id = CellId(format!("cell-{}", self.next_id));
            self.next_id += 1;
            if !self.cells.iter().any(|c| c.id == id) {
                return id;
            }
        }
    }

    fn push_unit(&mut self, row: u32, col: u32) {
        let id = self.fresh_id();
        self.cells.push(Cell::new(id, Footprint::unit(row, col)));
    }

    pub fn append_row(&mut self) {
        self.rows += 1;
        self.tracks.push(Axis::Rows);
        let row = self.rows;
        for col in 1..=self.cols {
            self.push_unit(row, col);
        }
        tracing::debug!(rows = self.rows, "row appended");
    }

    pub fn append_column(&mut self) {
        self.cols += 1;
        self.tracks.push(Axis::Columns);
        let col = self.cols;
        for row in 1..=self.rows {
            self.push_unit(row, col);
        }
        tracing::debug!(cols = self.cols, "column appended");
    }

    fn lies_in_line(footprint: &Footprint, axis: Axis, index: u32) -> bool {
        match axis {
            Axis::Rows => footprint.row == index && footprint.row_span == 1,
            Axis::Columns => footprint.col == index && footprint.col_span == 1,
        }
    }

    /// True if removing line `index` on `axis` would discard a photo
    pub fn line_has_occupant(&self, axis: Axis, index: u32) -> bool {
        self.cells
            .iter()
            .any(|c| c.is_occupied() && Self::lies_in_line(&c.footprint, axis, index))
    }

    pub fn remove_last_row(&mut self, consent: Consent) -> Result<(), LayoutError> {
        self.remove_last_line(Axis::Rows, consent)
    }

    pub fn remove_last_column(&mut self, consent: Consent) -> Result<(), LayoutError> {
        self.remove_last_line(Axis::Columns, consent)
    }

    /// Drop the last row or column.
    ///
    /// Cells lying entirely in the line are deleted. Merged cells reaching
    /// into it from before lose one unit of span so they stay in bounds.
    fn remove_last_line(&mut self, axis: Axis, consent: Consent) -> Result<(), LayoutError> {
        let last = self.dimension(axis);
        if last <= 1 {
            return Err(LayoutError::Blocked(BlockReason::LastLine));
        }
        if consent == Consent::NotGiven && self.line_has_occupant(axis, last) {
            return Err(LayoutError::RequiresConfirmation(ConfirmTarget::Line {
                axis,
                index: last,
            }));
        }

        self.cells
            .retain(|c| !Self::lies_in_line(&c.footprint, axis, last));
        for cell in &mut self.cells {
            let f = &mut cell.footprint;
            match axis {
                Axis::Rows if f.row_end() > last => f.row_span -= 1,
                Axis::Columns if f.col_end() > last => f.col_span -= 1,
                _ => {}
            }
        }
        match axis {
            Axis::Rows => self.rows -= 1,
            Axis::Columns => self.cols -= 1,
        }
        self.tracks.pop(axis);
        tracing::debug!(?axis, remaining = last - 1, "last line removed");
        Ok(())
    }

    /// The cell whose footprint covers `at`, if any
    pub fn cell_at(&self, at: Coord) -> Option<&Cell> {
        self.cells.iter().find(|c| c.footprint.contains(at))
    }

    pub fn find_cell_containing(&self, at: Coord) -> Result<&Cell, LayoutError> {
        self.cell_at(at).ok_or(LayoutError::NoCellAt(at))
    }

    pub fn find_cell_by_id(&self, id: &CellId) -> Result<&Cell, LayoutError> {
        self.cells
            .iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| LayoutError::CellNotFound(id.clone()))
    }

    pub(crate) fn cell_mut(&mut self, id: &CellId) -> Result<&mut Cell, LayoutError> {
        self.cells
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| LayoutError::CellNotFound(id.clone()))
    }

    pub(crate) fn take_cell(&mut self, id: &CellId) -> Result<Cell, LayoutError> {
        let idx = self
            .cells
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| LayoutError::CellNotFound(id.clone()))?;
        Ok(self.cells.remove(idx))
    }

    pub(crate) fn retain_cells(&mut self, keep: impl FnMut(&Cell) -> bool) {
        self.cells.retain(keep);
    }

    fn covers_origin_of(other: &Cell, cell: &Cell) -> bool {
        other.id != cell.id && other.footprint.contains(cell.footprint.origin())
    }

    /// True if the position at this cell's origin is claimed by another
    /// cell's footprint. This is the grid-level occupancy query for a
    /// coordinate, asked about the origin of the given cell.
    pub fn is_occupied(&self, id: &CellId) -> Result<bool, LayoutError> {
        let cell = self.find_cell_by_id(id)?;
        Ok(!self.is_visible(cell))
    }

    /// A cell is visible unless another cell covers its origin
    pub fn is_visible(&self, cell: &Cell) -> bool {
        !self.cells.iter().any(|c| Self::covers_origin_of(c, cell))
    }

    /// Cells to render and persist, in stable order. Call again to restart.
    pub fn visible_cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(move |c| self.is_visible(c))
    }

    /// True if no cell other than `except` overlaps `area`
    pub(crate) fn region_is_free(&self, area: &Footprint, except: &CellId) -> bool {
        !self
            .cells
            .iter()
            .any(|c| &c.id != except && c.footprint.overlaps(area))
    }

    /// Drop a photo onto a cell, replacing any previous occupant
    pub fn place_photo(&mut self, id: &CellId, photo: PhotoId) -> Result<(), LayoutError> {
        if self.is_occupied(id)? {
            return Err(LayoutError::Blocked(BlockReason::Shadowed));
        }
        let cell = self.cell_mut(id)?;
        cell.occupant = Some(Placement::centered(photo));
        Ok(())
    }

    /// Take the photo out of a cell. The photo stays in the gallery.
    pub fn remove_photo(&mut self, id: &CellId) -> Result<Option<Placement>, LayoutError> {
        Ok(self.cell_mut(id)?.occupant.take())
    }

    pub fn clear_photos(&mut self) {
        for cell in &mut self.cells {
            cell.occupant = None;
        }
    }

    pub fn placement(&self, id: &CellId) -> Result<Option<&Placement>, LayoutError> {
        Ok(self.find_cell_by_id(id)?.occupant.as_ref())
    }

    pub fn placement_mut(&mut self, id: &CellId) -> Result<Option<&mut Placement>, LayoutError> {
        Ok(self.cell_mut(id)?.occupant.as_mut())
    }

    pub fn photos_on_canvas(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }

    /// Check the partition invariants: dimensions, bounds, spans, no overlap
    pub fn is_consistent(&self) -> bool {
        if self.rows < 1 || self.cols < 1 {
            return false;
        }
        if self.tracks.weights(Axis::Rows).len() != self.rows as usize
            || self.tracks.weights(Axis::Columns).len() != self.cols as usize
        {
            return false;
        }
        for (i, a) in self.cells.iter().enumerate() {
            if !a.footprint.fits(self.rows, self.cols) {
                return false;
            }
            for b in &self.cells[i + 1..] {
                if a.id == b.id || a.footprint.overlaps(&b.footprint) {
                    return false;
                }
            }
        }
        true
    }
}

impl Default for GridPartition {
    fn default() -> Self {
        Self::new(4, 4)
    }
}
