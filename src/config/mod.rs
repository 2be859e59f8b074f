use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::raster::{ResizeFilter, DEFAULT_MAX_INPUT_BYTES};

/// Conversion defaults stored as TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Icon sizes to embed, in directory order.
    #[serde(default = "default_sizes")]
    pub sizes: Vec<u32>,
    /// Resampling filter.
    #[serde(default)]
    pub filter: ResizeFilter,
    /// Where to write `.ico` files; current directory when unset.
    pub output_dir: Option<PathBuf>,
    /// Reject source files larger than this.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,
}

fn default_sizes() -> Vec<u32> {
    vec![256]
}

fn default_max_input_bytes() -> u64 {
    DEFAULT_MAX_INPUT_BYTES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sizes: default_sizes(),
            filter: ResizeFilter::default(),
            output_dir: None,
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

impl AppConfig {
    /// Config file path: ~/.config/icoforge/config.toml
    pub fn path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("icoforge");
        config_dir.join("config.toml")
    }

    /// Load config from disk, or return defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }
        Self::default()
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        tracing::info!("Config saved to {}", path.display());
        Ok(())
    }
}
