// ABOUTME: On-disk store of named layouts for restoring collages.
// ABOUTME: Each layout is saved as zstd-compressed JSON with a version envelope.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::record::LayoutRecord;

const EXTENSION: &str = "layout";

/// Versioned wrapper written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredLayout {
    version: u32,
    record: LayoutRecord,
}

/// Directory of saved layouts, one file per layout name
#[derive(Debug, Clone)]
pub struct LayoutStore {
    dir: PathBuf,
}

impl LayoutStore {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the default data directory (~/.local/share/photo-collage/layouts)
    pub fn open_default() -> Result<Self, StoreError> {
        Self::default_dir().map(Self::new).ok_or(StoreError::NoDataPath)
    }

    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("photo-collage").join("layouts"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let safe: String = name
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.{EXTENSION}"))
    }

    /// Save a record under `name`, replacing any previous layout of that name
    pub fn save(&self, name: &str, record: &LayoutRecord) -> Result<PathBuf, StoreError> {
        std::fs::create_dir_all(&self.dir)?;

        let stored = StoredLayout {
            version: Self::CURRENT_VERSION,
            record: record.clone(),
        };
        let json = serde_json::to_vec(&stored)?;
        let mut encoder = zstd::Encoder::new(Vec::new(), 3)?;
        encoder.write_all(&json)?;
        let compressed = encoder.finish()?;

        let path = self.path_for(name);
        std::fs::write(&path, compressed)?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<LayoutRecord, StoreError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(StoreError::UnknownLayout(name.to_string()));
        }
        Self::load_path(&path)
    }

    /// Load a layout file from an arbitrary path
    pub fn load_path(path: &Path) -> Result<LayoutRecord, StoreError> {
        let compressed = std::fs::read(path)?;

        let mut decoder = zstd::Decoder::new(&compressed[..])?;
        let mut json = Vec::new();
        decoder.read_to_end(&mut json)?;

        let stored: StoredLayout = serde_json::from_slice(&json)?;
        if stored.version > Self::CURRENT_VERSION {
            return Err(StoreError::UnsupportedVersion(stored.version));
        }
        Ok(stored.record)
    }

    /// Names of all saved layouts, sorted
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine data directory")]
    NoDataPath,

    #[error("No saved layout named {0:?}")]
    UnknownLayout(String),

    #[error("Unsupported layout version: {0}")]
    UnsupportedVersion(u32),
}
