// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves editor defaults from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Grid dimensions used when a new collage is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridDefaults {
    pub rows: u32,
    pub cols: u32,
}

impl Default for GridDefaults {
    fn default() -> Self {
        Self { rows: 4, cols: 4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GallerySettings {
    /// How many photos the gallery accepts in total
    pub max_photos: usize,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self { max_photos: 16 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// Zoom change per wheel notch
    pub zoom_step: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self { zoom_step: 0.05 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name stamped into exported layouts
    pub album_name: String,

    pub grid: GridDefaults,

    pub gallery: GallerySettings,

    pub placement: PlacementSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            album_name: "My Photo Album".to_string(),
            grid: GridDefaults::default(),
            gallery: GallerySettings::default(),
            placement: PlacementSettings::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

impl Config {
    /// Get the default config file path (~/.config/photo-collage/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("photo-collage").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save config to default path
    pub fn save_to_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::ReadError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)?;
        Ok(path)
    }
}
