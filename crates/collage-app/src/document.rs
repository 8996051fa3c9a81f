// ABOUTME: An open collage: grid, photo gallery and album name.
// ABOUTME: Loads from and saves to layout JSON files through the serializer.

use std::path::Path;

use anyhow::{Context, Result};
use collage_core::{Config, LayoutRecord, PhotoGallery};
use collage_layout::serializer::{self, ImportReport};
use collage_layout::{CellId, Coord, GridPartition};

pub struct Document {
    pub name: String,
    pub grid: GridPartition,
    pub gallery: PhotoGallery,
}

impl Document {
    pub fn new(config: &Config, name: Option<String>, rows: Option<u32>, cols: Option<u32>) -> Self {
        Self {
            name: name.unwrap_or_else(|| config.album_name.clone()),
            grid: GridPartition::new(
                rows.unwrap_or(config.grid.rows),
                cols.unwrap_or(config.grid.cols),
            ),
            gallery: PhotoGallery::new(config.gallery.max_photos),
        }
    }

    pub fn from_record(config: &Config, record: &LayoutRecord) -> (Self, ImportReport) {
        let imported = serializer::import(record);
        let mut gallery = PhotoGallery::new(config.gallery.max_photos.max(imported.photos.len()));
        gallery.replace_all(imported.photos);
        let doc = Self {
            name: record.name.clone(),
            grid: imported.grid,
            gallery,
        };
        (doc, imported.report)
    }

    pub fn load(config: &Config, path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading layout {}", path.display()))?;
        let record = LayoutRecord::from_json(&json)
            .with_context(|| format!("parsing layout {}", path.display()))?;
        let (doc, report) = Self::from_record(config, &record);
        if !report.is_clean() {
            tracing::warn!("Layout {} was repaired on load: {:?}", path.display(), report);
        }
        Ok(doc)
    }

    pub fn to_record(&self) -> LayoutRecord {
        serializer::export(&self.grid, self.gallery.photos(), &self.name)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_record().to_json_pretty()?;
        std::fs::write(path, json).with_context(|| format!("writing layout {}", path.display()))?;
        tracing::info!("Saved layout to {}", path.display());
        Ok(())
    }

    /// Id of the cell covering a 1-based grid position
    pub fn cell_at(&self, row: u32, col: u32) -> Result<CellId> {
        Ok(self
            .grid
            .find_cell_containing(Coord::new(row, col))?
            .id()
            .clone())
    }
}
