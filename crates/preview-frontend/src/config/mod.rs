//! Application configuration module
//!
//! Preview behavior, viewport and UI settings, persisted between sessions.

mod manager;

pub use manager::{ConfigError, ConfigManager, SharedConfig, create_shared_config};

use preview_core::{Color, PreviewConfig};
use serde::{Deserialize, Serialize};

/// Viewport settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewportConfig {
    /// Clear color behind the model
    pub background: Color,
    /// Slowly turn the model when not dragging
    pub auto_rotate: bool,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            background: Color::rgb(0x2b, 0x2d, 0x31),
            auto_rotate: false,
            fov_degrees: 45.0,
        }
    }
}

/// UI theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum UiTheme {
    #[default]
    Dark,
    Light,
}

impl UiTheme {
    pub fn visuals(&self) -> egui::Visuals {
        match self {
            UiTheme::Dark => egui::Visuals::dark(),
            UiTheme::Light => egui::Visuals::light(),
        }
    }
}

/// UI preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UiConfig {
    pub theme: UiTheme,
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    /// Directory the model asset paths are resolved against (native only)
    #[serde(default = "default_assets_root")]
    pub assets_root: String,
    /// Model loading and input handling
    #[serde(default)]
    pub preview: PreviewConfig,
    /// Viewport settings
    #[serde(default)]
    pub viewport: ViewportConfig,
    /// UI settings
    #[serde(default)]
    pub ui: UiConfig,
}

fn default_assets_root() -> String {
    "assets".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 0,
            assets_root: default_assets_root(),
            preview: PreviewConfig::default(),
            viewport: ViewportConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preview_core::ModelKind;

    #[test]
    fn test_app_config_round_trip() {
        let mut config = AppConfig::new();
        config.preview.initial_model = Some(ModelKind::Cushion);
        config.viewport.auto_rotate = true;
        config.ui.theme = UiTheme::Light;

        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let parsed: AppConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig = ron::from_str("(version: 1, ui: (theme: Light))").unwrap();
        assert_eq!(parsed.ui.theme, UiTheme::Light);
        assert_eq!(parsed.assets_root, "assets");
        assert_eq!(parsed.preview, PreviewConfig::default());
        assert_eq!(parsed.viewport, ViewportConfig::default());
    }
}
