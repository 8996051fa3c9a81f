// ABOUTME: Photo records and per-cell photo placement.
// ABOUTME: Placement holds pan offset, zoom and rotation with zoom clamping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque photo identifier, stable across save/load
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub String);

impl PhotoId {
    /// Generate a fresh, unique id
    pub fn generate() -> Self {
        Self(format!("photo-{}", ulid::Ulid::new()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Displayable image reference (a data URL or any URI the renderer understands)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A photo in the gallery. Cells reference photos by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub image: ImageRef,
    pub original_filename: String,
}

impl Photo {
    pub fn new(id: PhotoId, image: ImageRef, original_filename: impl Into<String>) -> Self {
        Self {
            id,
            image,
            original_filename: original_filename.into(),
        }
    }
}

/// Smallest allowed zoom factor
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed zoom factor
pub const MAX_SCALE: f64 = 5.0;

/// Wheel notch direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wheel {
    /// Scrolling up zooms in
    Up,
    /// Scrolling down zooms out
    Down,
}

/// How a photo sits inside its cell.
///
/// `x`/`y` are percentages of the cell size (50/50 is centered) and are not
/// clamped, so a photo may be panned partially out of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub photo: PhotoId,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation_deg: f64,
}

impl Placement {
    pub fn centered(photo: PhotoId) -> Self {
        Self {
            photo,
            x: 50.0,
            y: 50.0,
            scale: 1.0,
            rotation_deg: 0.0,
        }
    }

    /// Adjust zoom by `delta`, saturating at the scale bounds
    pub fn zoom_by(&mut self, delta: f64) {
        self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Apply one wheel notch of size `step`
    pub fn wheel(&mut self, notch: Wheel, step: f64) {
        let delta = match notch {
            Wheel::Up => step,
            Wheel::Down => -step,
        };
        self.zoom_by(delta);
    }

    /// Set the offset relative to a pre-drag placement
    pub fn pan_from(&mut self, origin: &Placement, dx_percent: f64, dy_percent: f64) {
        self.x = origin.x + dx_percent;
        self.y = origin.y + dy_percent;
    }

    pub fn rotate_by(&mut self, degrees: f64) {
        self.rotation_deg += degrees;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_placement_defaults() {
        let p = Placement::centered(PhotoId::from("a"));
        assert_eq!((p.x, p.y, p.scale, p.rotation_deg), (50.0, 50.0, 1.0, 0.0));
    }

    #[test]
    fn zoom_in_saturates_at_max() {
        let mut p = Placement::centered(PhotoId::from("a"));
        for _ in 0..200 {
            p.wheel(Wheel::Up, 0.05);
            assert!(p.scale <= MAX_SCALE);
        }
        assert_eq!(p.scale, MAX_SCALE);
    }

    #[test]
    fn zoom_out_saturates_at_min() {
        let mut p = Placement::centered(PhotoId::from("a"));
        for _ in 0..200 {
            p.wheel(Wheel::Down, 0.05);
            assert!(p.scale >= MIN_SCALE);
        }
        assert_eq!(p.scale, MIN_SCALE);
    }

    #[test]
    fn pan_is_relative_to_origin_and_unclamped() {
        let origin = Placement::centered(PhotoId::from("a"));
        let mut p = origin.clone();
        p.pan_from(&origin, 80.0, -70.0);
        p.pan_from(&origin, 90.0, -75.0);
        assert_eq!((p.x, p.y), (140.0, -25.0));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(PhotoId::generate(), PhotoId::generate());
    }
}
