//! Settings persistence
//!
//! Native builds keep a RON file in the OS config directory; the browser
//! build has no file to read and always starts from defaults.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use super::AppConfig;

/// Settings shared between the app and its panels
pub type SharedConfig = Arc<RwLock<ConfigManager>>;

/// Why the settings file could not be read or written
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("settings file I/O failed: {0}")]
    Io(String),
    #[error("could not encode settings: {0}")]
    Serialize(String),
    #[error("settings file is not valid RON: {0}")]
    Deserialize(String),
}

/// Loads the app configuration once and writes it back when changed
pub struct ConfigManager {
    config: AppConfig,
    config_path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Settings from `<config dir>/product-preview/config.ron`
    pub fn new() -> Self {
        Self::with_path(Self::config_dir().join("config.ron"))
    }

    /// Settings from `config_path`; a missing or unreadable file yields defaults
    pub fn with_path(config_path: PathBuf) -> Self {
        let config = Self::load_from_path(&config_path).unwrap_or_else(|| {
            tracing::info!("No config file found, using defaults");
            AppConfig::new()
        });

        Self {
            config,
            config_path,
            dirty: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("product-preview")
    }

    #[cfg(target_arch = "wasm32")]
    fn config_dir() -> PathBuf {
        PathBuf::from(".")
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_from_path(path: &Path) -> Option<AppConfig> {
        if !path.exists() {
            return None;
        }
        match Self::read_config(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to load config file: {}", e);
                None
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    #[cfg(target_arch = "wasm32")]
    fn load_from_path(_path: &Path) -> Option<AppConfig> {
        None
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Mutable access; marks the configuration as changed
    pub fn config_mut(&mut self) -> &mut AppConfig {
        self.dirty = true;
        &mut self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the configuration to disk if it changed
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(&self.config_path, &content).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::info!("Saved config to {:?}", self.config_path);
        self.dirty = false;
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&mut self) -> Result<(), ConfigError> {
        self.dirty = false;
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        self.config = AppConfig::new();
        self.dirty = true;
    }

    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_shared_config() -> SharedConfig {
    Arc::new(RwLock::new(ConfigManager::new()))
}
