// ABOUTME: Grid partition engine for photo collages.
// ABOUTME: Merges and splits cells on a rectangular grid, sizes tracks and (de)serializes layouts.

mod cell;
mod drag;
mod error;
mod mutator;
mod partition;
pub mod serializer;
mod tracks;

pub use cell::{Cell, CellId, Coord, Footprint};
pub use drag::{DragController, DragKind, Point, Size};
pub use error::{BlockReason, ConfirmTarget, Consent, LayoutError};
pub use mutator::{Direction, Heal, SpanMutator};
pub use partition::GridPartition;
pub use serializer::{ImportReport, Imported};
pub use tracks::{Axis, Rect, TrackSizer, DEFAULT_WEIGHT, MAX_TRACKS, MIN_WEIGHT};
