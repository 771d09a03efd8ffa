//! Preview settings

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::model::ModelKind;

/// Settings that shape how the preview loads models and reacts to input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewConfig {
    /// Base color before the user picks one
    #[serde(default)]
    pub default_color: Color,
    /// Model selected at startup
    #[serde(default = "default_initial_model")]
    pub initial_model: Option<ModelKind>,
    /// Directory that holds `<id>.<extension>` model files
    #[serde(default = "default_asset_base")]
    pub asset_base: String,
    /// Model file extension
    #[serde(default = "default_model_extension")]
    pub model_extension: String,
    /// Apply a model selection only if no newer selection was issued while
    /// it was loading. When off, the selection that finishes last wins.
    #[serde(default)]
    pub sequence_model_requests: bool,
}

fn default_initial_model() -> Option<ModelKind> {
    Some(ModelKind::Cup)
}

fn default_asset_base() -> String {
    "models".to_string()
}

fn default_model_extension() -> String {
    "obj".to_string()
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            default_color: Color::NEUTRAL,
            initial_model: default_initial_model(),
            asset_base: default_asset_base(),
            model_extension: default_model_extension(),
            sequence_model_requests: false,
        }
    }
}
