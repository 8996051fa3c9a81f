// ABOUTME: Pointer drag protocol for divider resizing and photo panning.
// ABOUTME: begin/drag_to/end with per-drag anchor state that is always cleared on end.

use collage_core::Placement;

use crate::cell::CellId;
use crate::error::{BlockReason, LayoutError};
use crate::partition::GridPartition;
use crate::tracks::Axis;

/// Pointer position in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Rows => self.y,
            Axis::Columns => self.x,
        }
    }
}

/// Canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Rows => self.height,
            Axis::Columns => self.width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragKind {
    /// Divider `index` sits between tracks `index` and `index + 1`
    Divider { axis: Axis, index: usize },
    /// Move the photo inside a cell
    Pan { cell: CellId },
}

#[derive(Debug)]
enum ActiveDrag {
    Divider {
        axis: Axis,
        index: usize,
        anchor: f64,
    },
    Pan {
        cell: CellId,
        start: Point,
        origin: Placement,
    },
}

/// Tracks the drag in progress, if any
#[derive(Debug, Default)]
pub struct DragController {
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Start a drag at `pointer`. Any drag that never saw its end is dropped.
    pub fn begin_drag(
        &mut self,
        grid: &GridPartition,
        kind: DragKind,
        pointer: Point,
    ) -> Result<(), LayoutError> {
        if self.active.take().is_some() {
            tracing::warn!("Discarding stale drag state");
        }
        self.active = Some(match kind {
            DragKind::Divider { axis, index } => ActiveDrag::Divider {
                axis,
                index,
                anchor: pointer.along(axis),
            },
            DragKind::Pan { cell } => {
                let origin = grid
                    .placement(&cell)?
                    .cloned()
                    .ok_or(LayoutError::Blocked(BlockReason::EmptyCell))?;
                ActiveDrag::Pan {
                    cell,
                    start: pointer,
                    origin,
                }
            }
        });
        Ok(())
    }

    /// Feed one pointer-move. Returns whether the tick changed anything.
    ///
    /// Divider ticks that would squeeze a track below the minimum are
    /// dropped and the anchor stays put, so the next tick measures from the
    /// last accepted position.
    pub fn drag_to(&mut self, grid: &mut GridPartition, pointer: Point, canvas: Size) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        match active {
            ActiveDrag::Divider {
                axis,
                index,
                anchor,
            } => {
                let position = pointer.along(*axis);
                let accepted = grid.tracks_mut().drag_divider(
                    *axis,
                    *index,
                    position - *anchor,
                    canvas.along(*axis),
                );
                if accepted {
                    *anchor = position;
                }
                accepted
            }
            ActiveDrag::Pan {
                cell,
                start,
                origin,
            } => {
                let Ok(footprint) = grid.find_cell_by_id(cell).map(|c| c.footprint()) else {
                    return false;
                };
                let tracks = grid.tracks();
                let width =
                    tracks.span_extent(Axis::Columns, footprint.col, footprint.col_span, canvas.width);
                let height =
                    tracks.span_extent(Axis::Rows, footprint.row, footprint.row_span, canvas.height);
                if width <= 0.0 || height <= 0.0 {
                    return false;
                }
                let dx = (pointer.x - start.x) / width * 100.0;
                let dy = (pointer.y - start.y) / height * 100.0;
                match grid.placement_mut(cell) {
                    Ok(Some(placement)) => {
                        placement.pan_from(origin, dx, dy);
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    /// Finish the drag. Safe to call when nothing is active.
    pub fn end_drag(&mut self) {
        self.active = None;
    }
}
