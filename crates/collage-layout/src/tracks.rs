// ABOUTME: Fractional row/column sizing ("fr" weights) for the collage grid.
// ABOUTME: Converts divider drags in pixels into weight transfers between neighbouring tracks.

use crate::cell::Footprint;

/// Smallest weight a track may be dragged down to
pub const MIN_WEIGHT: f64 = 0.2;

/// Weight given to new or reset tracks
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Most rows or columns a grid is created or imported with
pub const MAX_TRACKS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Rows,
    Columns,
}

/// Rectangle in normalized canvas coordinates (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Row and column weights. Lengths always match the grid dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSizer {
    rows: Vec<f64>,
    columns: Vec<f64>,
}

impl TrackSizer {
    pub fn uniform(rows: u32, cols: u32) -> Self {
        Self {
            rows: vec![DEFAULT_WEIGHT; rows as usize],
            columns: vec![DEFAULT_WEIGHT; cols as usize],
        }
    }

    /// Build from stored weights. Callers are expected to have validated them.
    pub(crate) fn from_weights(rows: Vec<f64>, columns: Vec<f64>) -> Self {
        Self { rows, columns }
    }

    pub fn weights(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::Rows => &self.rows,
            Axis::Columns => &self.columns,
        }
    }

    fn weights_mut(&mut self, axis: Axis) -> &mut Vec<f64> {
        match axis {
            Axis::Rows => &mut self.rows,
            Axis::Columns => &mut self.columns,
        }
    }

    pub fn total(&self, axis: Axis) -> f64 {
        self.weights(axis).iter().sum()
    }

    pub(crate) fn push(&mut self, axis: Axis) {
        self.weights_mut(axis).push(DEFAULT_WEIGHT);
    }

    pub(crate) fn pop(&mut self, axis: Axis) {
        self.weights_mut(axis).pop();
    }

    /// Set every weight on `axis` back to 1
    pub fn reset(&mut self, axis: Axis) {
        self.weights_mut(axis).fill(DEFAULT_WEIGHT);
    }

    /// Move divider `index` (between tracks `index` and `index + 1`) by
    /// `pixel_delta` on a canvas `extent` pixels long.
    ///
    /// The weight moved from one track to the other is proportional to the
    /// pixel delta. The tick is applied only if both tracks stay at or above
    /// [`MIN_WEIGHT`]; otherwise nothing changes and `false` is returned.
    pub fn drag_divider(&mut self, axis: Axis, index: usize, pixel_delta: f64, extent: f64) -> bool {
        if !extent.is_finite() || extent <= 0.0 || !pixel_delta.is_finite() {
            return false;
        }
        let total = self.total(axis);
        let weights = self.weights_mut(axis);
        let Some(next) = index.checked_add(1).filter(|&next| next < weights.len()) else {
            return false;
        };

        let delta = pixel_delta / extent * total;
        if !delta.is_finite() {
            return false;
        }
        let left = weights[index] + delta;
        let right = weights[next] - delta;
        if left < MIN_WEIGHT || right < MIN_WEIGHT {
            tracing::trace!(?axis, index, left, right, "divider tick dropped");
            return false;
        }

        weights[index] = left;
        weights[next] = right;
        true
    }

    /// Fraction of `axis` occupied by `count` tracks starting at `start` (0-based)
    fn fraction(&self, axis: Axis, start: usize, count: usize) -> f64 {
        let weights = self.weights(axis);
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let end = (start + count).min(weights.len());
        let start = start.min(end);
        weights[start..end].iter().sum::<f64>() / total
    }

    /// Position of divider `index` as a fraction of the canvas
    pub fn divider_position(&self, axis: Axis, index: usize) -> f64 {
        self.fraction(axis, 0, index + 1)
    }

    /// Dividers that can be dragged on `axis`
    pub fn divider_count(&self, axis: Axis) -> usize {
        self.weights(axis).len().saturating_sub(1)
    }

    /// Pixel length of `span` tracks starting at 1-based `start`
    pub fn span_extent(&self, axis: Axis, start: u32, span: u32, extent: f64) -> f64 {
        self.fraction(axis, start.saturating_sub(1) as usize, span as usize) * extent
    }

    /// Where a footprint lands on the canvas
    pub fn cell_rect(&self, footprint: Footprint) -> Rect {
        let col0 = footprint.col.saturating_sub(1) as usize;
        let row0 = footprint.row.saturating_sub(1) as usize;
        Rect {
            x: self.fraction(Axis::Columns, 0, col0),
            y: self.fraction(Axis::Rows, 0, row0),
            width: self.fraction(Axis::Columns, col0, footprint.col_span as usize),
            height: self.fraction(Axis::Rows, row0, footprint.row_span as usize),
        }
    }

    /// CSS-style template, e.g. `"1fr 1.5fr 0.5fr"`
    pub fn template(&self, axis: Axis) -> String {
        self.weights(axis)
            .iter()
            .map(|w| format!("{w}fr"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_moves_weight_between_neighbours() {
        let mut tracks = TrackSizer::uniform(1, 4);
        // 4 fr over 400px: 50px is 0.5 fr
        assert!(tracks.drag_divider(Axis::Columns, 1, 50.0, 400.0));
        assert_eq!(tracks.weights(Axis::Columns), &[1.0, 1.5, 0.5, 1.0]);
        assert!((tracks.total(Axis::Columns) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn drag_below_floor_is_dropped_whole() {
        let mut tracks = TrackSizer::uniform(2, 1);
        assert!(!tracks.drag_divider(Axis::Rows, 0, -90.0, 200.0));
        assert_eq!(tracks.weights(Axis::Rows), &[1.0, 1.0]);
    }

    #[test]
    fn drag_on_last_divider_index_is_rejected() {
        let mut tracks = TrackSizer::uniform(2, 2);
        assert!(!tracks.drag_divider(Axis::Columns, 1, 5.0, 100.0));
        assert!(!tracks.drag_divider(Axis::Columns, 0, 5.0, 0.0));
    }

    #[test]
    fn drag_ignores_non_finite_extent_and_huge_index() {
        let mut tracks = TrackSizer::uniform(1, 2);
        assert!(!tracks.drag_divider(Axis::Columns, 0, 5.0, f64::NAN));
        assert!(!tracks.drag_divider(Axis::Columns, 0, 5.0, f64::INFINITY));
        assert!(!tracks.drag_divider(Axis::Columns, usize::MAX, 5.0, 100.0));
        // Tiny extent turns a finite delta into infinity
        assert!(!tracks.drag_divider(Axis::Columns, 0, f64::MAX, f64::MIN_POSITIVE));
        assert_eq!(tracks.weights(Axis::Columns), &[1.0, 1.0]);
    }

    #[test]
    fn reset_restores_uniform() {
        let mut tracks = TrackSizer::uniform(1, 3);
        tracks.drag_divider(Axis::Columns, 0, 10.0, 100.0);
        tracks.reset(Axis::Columns);
        assert_eq!(tracks.weights(Axis::Columns), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn divider_position_is_cumulative_fraction() {
        let tracks = TrackSizer::from_weights(vec![1.0], vec![1.0, 2.0, 1.0]);
        assert!((tracks.divider_position(Axis::Columns, 0) - 0.25).abs() < 1e-9);
        assert!((tracks.divider_position(Axis::Columns, 1) - 0.75).abs() < 1e-9);
        assert_eq!(tracks.divider_count(Axis::Columns), 2);
    }

    #[test]
    fn cell_rect_follows_weights() {
        let tracks = TrackSizer::from_weights(vec![3.0, 1.0], vec![1.0, 1.0]);
        let rect = tracks.cell_rect(Footprint::new(2, 1, 1, 2));
        assert!((rect.x - 0.0).abs() < 1e-9);
        assert!((rect.y - 0.75).abs() < 1e-9);
        assert!((rect.width - 1.0).abs() < 1e-9);
        assert!((rect.height - 0.25).abs() < 1e-9);
        assert!((tracks.span_extent(Axis::Rows, 1, 1, 800.0) - 600.0).abs() < 1e-9);
    }

    #[test]
    fn template_lists_weights() {
        let tracks = TrackSizer::from_weights(vec![1.0], vec![1.0, 1.5]);
        assert_eq!(tracks.template(Axis::Columns), "1fr 1.5fr");
    }
}
