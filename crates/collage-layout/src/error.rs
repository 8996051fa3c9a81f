// ABOUTME: Error types for grid edits.
// ABOUTME: Blocked preconditions, failed lookups and requests for user consent.

use std::fmt;

use crate::cell::{CellId, Coord};
use crate::tracks::Axis;

/// Why an edit was refused. Callers use this to disable the matching control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BlockReason {
    #[error("would extend past the grid edge")]
    OutOfBounds,

    #[error("neighbouring cell holds a photo")]
    OccupiedNeighbour,

    #[error("neighbouring cell is already merged")]
    MergedNeighbour,

    #[error("span is already 1")]
    MinimumSpan,

    #[error("grid needs at least one row and column")]
    LastLine,

    /// The cell's origin is covered by another cell
    #[error("cell is covered by another cell")]
    Shadowed,

    #[error("cell has no photo")]
    EmptyCell,
}

/// What a destructive edit would discard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmTarget {
    Line { axis: Axis, index: u32 },
    Cell(CellId),
}

impl fmt::Display for ConfirmTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmTarget::Line {
                axis: Axis::Rows,
                index,
            } => write!(f, "row {index}"),
            ConfirmTarget::Line {
                axis: Axis::Columns,
                index,
            } => write!(f, "column {index}"),
            ConfirmTarget::Cell(id) => write!(f, "cell {id}"),
        }
    }
}

/// Whether the user already agreed to discard photos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Consent {
    #[default]
    NotGiven,
    Given,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Blocked: {0}")]
    Blocked(BlockReason),

    #[error("No cell with id {0}")]
    CellNotFound(CellId),

    #[error("No cell covers {0}")]
    NoCellAt(Coord),

    #[error("{0} has photos; confirmation required")]
    RequiresConfirmation(ConfirmTarget),
}

impl LayoutError {
    pub fn is_blocked(&self) -> bool {
        matches!(self, LayoutError::Blocked(_))
    }
}
