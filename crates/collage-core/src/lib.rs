// ABOUTME: Shared types and configuration for photo-collage.
// ABOUTME: Defines photos, placements, the layout record, gallery and layout store.

pub mod config;
pub mod gallery;
pub mod photo;
pub mod record;
pub mod store;

pub use config::{Config, ConfigError};
pub use gallery::{DataUrlDecoder, ImageDecoder, IngestError, IngestReport, PhotoGallery, SourceFile};
pub use photo::{ImageRef, Photo, PhotoId, Placement, Wheel, MAX_SCALE, MIN_SCALE};
pub use record::{CellRecord, LayoutRecord, PhotoRecord, PositionRecord};
pub use store::{LayoutStore, StoreError};
