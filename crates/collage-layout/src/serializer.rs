// ABOUTME: Conversion between a live grid + photo set and the portable layout record.
// ABOUTME: Export keeps visible cells only; import repairs malformed records instead of failing.

use std::collections::HashSet;

use collage_core::{
    CellRecord, ImageRef, LayoutRecord, Photo, PhotoId, PhotoRecord, Placement, PositionRecord,
    MAX_SCALE, MIN_SCALE,
};

use crate::cell::{Cell, CellId, Footprint};
use crate::partition::GridPartition;
use crate::tracks::{Axis, TrackSizer, DEFAULT_WEIGHT, MAX_TRACKS, MIN_WEIGHT};

/// Build the persisted record for a grid and the photos available to it
pub fn export(grid: &GridPartition, photos: &[Photo], name: &str) -> LayoutRecord {
    let cells = grid
        .visible_cells()
        .map(|cell| {
            let f = cell.footprint();
            let occupant = cell.occupant();
            CellRecord {
                id: cell.id().to_string(),
                row: f.row,
                col: f.col,
                row_span: f.row_span,
                col_span: f.col_span,
                photo_id: occupant.map(|p| p.photo.to_string()),
                photo_position: occupant.map(|p| PositionRecord {
                    x: p.x,
                    y: p.y,
                    scale: p.scale,
                }),
                photo_rotation: occupant.map(|p| p.rotation_deg),
            }
        })
        .collect();

    LayoutRecord {
        name: name.to_string(),
        grid_rows: grid.rows(),
        grid_cols: grid.cols(),
        column_weights: grid.tracks().weights(Axis::Columns).to_vec(),
        row_weights: grid.tracks().weights(Axis::Rows).to_vec(),
        cells,
        photos: photos
            .iter()
            .map(|p| PhotoRecord {
                id: p.id.to_string(),
                filename: p.original_filename.clone(),
                image_data: p.image.as_str().to_string(),
            })
            .collect(),
    }
}

/// What import had to fix up
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Grid dimension raised to 1 or lowered to the track limit
    pub repaired_dimensions: bool,
    /// Weights added, removed or raised to the floor
    pub repaired_weights: usize,
    /// Cells out of bounds, zero-sized or overlapping an earlier cell
    pub dropped_cells: usize,
    /// Cells whose duplicate id was replaced
    pub reissued_ids: usize,
    /// Cells imported empty because their photo reference did not resolve
    pub unresolved_photos: usize,
    /// Photo entries skipped as duplicates
    pub duplicate_photos: usize,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug)]
pub struct Imported {
    pub grid: GridPartition,
    pub photos: Vec<Photo>,
    pub report: ImportReport,
}

fn repair_weights(weights: &[f64], len: u32, axis: Axis, report: &mut ImportReport) -> Vec<f64> {
    let len = len as usize;
    let mut fixed: Vec<f64> = weights
        .iter()
        .take(len)
        .map(|&w| {
            if !w.is_finite() {
                report.repaired_weights += 1;
                DEFAULT_WEIGHT
            } else if w < MIN_WEIGHT {
                report.repaired_weights += 1;
                MIN_WEIGHT
            } else {
                w
            }
        })
        .collect();
    if weights.len() != len {
        tracing::warn!(?axis, found = weights.len(), expected = len, "Track count mismatch");
        report.repaired_weights += weights.len().abs_diff(len);
    }
    fixed.resize(len, DEFAULT_WEIGHT);
    fixed
}

fn resolve_placement(
    record: &CellRecord,
    photos: &[Photo],
    report: &mut ImportReport,
) -> Option<Placement> {
    let photo_id = record.photo_id.as_deref()?;
    let photo = photos.iter().find(|p| p.id.as_str() == photo_id);
    match (photo, record.photo_position) {
        (Some(photo), Some(position)) => Some(Placement {
            photo: photo.id.clone(),
            x: position.x,
            y: position.y,
            scale: position.scale.clamp(MIN_SCALE, MAX_SCALE),
            rotation_deg: record.photo_rotation.unwrap_or(0.0),
        }),
        _ => {
            tracing::warn!(cell = %record.id, photo = photo_id, "Photo reference did not resolve");
            report.unresolved_photos += 1;
            None
        }
    }
}

/// Rebuild a grid and photo set from a record.
///
/// Photos are rebuilt first so cells can resolve their references. Cells are
/// taken as recorded (spans included) but anything that would break the
/// partition is dropped and counted in the report.
pub fn import(record: &LayoutRecord) -> Imported {
    let mut report = ImportReport::default();

    let rows = record.grid_rows.clamp(1, MAX_TRACKS);
    let cols = record.grid_cols.clamp(1, MAX_TRACKS);
    if rows != record.grid_rows || cols != record.grid_cols {
        tracing::warn!(
            rows = record.grid_rows,
            cols = record.grid_cols,
            max = MAX_TRACKS,
            "Grid dimensions out of range"
        );
        report.repaired_dimensions = true;
    }

    let tracks = TrackSizer::from_weights(
        repair_weights(&record.row_weights, rows, Axis::Rows, &mut report),
        repair_weights(&record.column_weights, cols, Axis::Columns, &mut report),
    );

    let mut photos: Vec<Photo> = Vec::with_capacity(record.photos.len());
    for entry in &record.photos {
        if photos.iter().any(|p| p.id.as_str() == entry.id) {
            report.duplicate_photos += 1;
            continue;
        }
        photos.push(Photo::new(
            PhotoId(entry.id.clone()),
            ImageRef(entry.image_data.clone()),
            entry.filename.clone(),
        ));
    }

    let recorded_ids: HashSet<&str> = record.cells.iter().map(|c| c.id.as_str()).collect();
    let mut used_ids: HashSet<String> = HashSet::new();
    let mut next_spare = 0u64;
    let mut cells: Vec<Cell> = Vec::with_capacity(record.cells.len());

    for entry in &record.cells {
        let footprint = Footprint::new(entry.row, entry.col, entry.row_span, entry.col_span);
        if !footprint.fits(rows, cols) {
            tracing::warn!(cell = %entry.id, "Dropping cell outside the grid");
            report.dropped_cells += 1;
            continue;
        }
        if cells.iter().any(|c| c.footprint.overlaps(&footprint)) {
            tracing::warn!(cell = %entry.id, "Dropping overlapping cell");
            report.dropped_cells += 1;
            continue;
        }

        let id = if used_ids.contains(&entry.id) {
            report.reissued_ids += 1;
            loop {
                let candidate = format!("cell-imported-{next_spare}");
                next_spare += 1;
                if !recorded_ids.contains(candidate.as_str()) && !used_ids.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            entry.id.clone()
        };
        used_ids.insert(id.clone());

        let mut cell = Cell::new(CellId(id), footprint);
        cell.occupant = resolve_placement(entry, &photos, &mut report);
        cells.push(cell);
    }

    if !report.is_clean() {
        tracing::warn!(?report, "Layout record needed repairs");
    }

    Imported {
        grid: GridPartition::from_parts(rows, cols, tracks, cells),
        photos,
        report,
    }
}
