//! Error types

use crate::model::ModelKind;

/// Errors surfaced by preview operations.
///
/// None of these are fatal: the operation that produced one leaves the
/// preview state exactly as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreviewError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Failed to load model '{model}': {reason}")]
    AssetLoad { model: ModelKind, reason: String },

    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

impl PreviewError {
    pub(crate) fn asset_load(model: ModelKind, reason: impl ToString) -> Self {
        PreviewError::AssetLoad {
            model,
            reason: reason.to_string(),
        }
    }
}

/// Errors returned by an [`AssetSource`](crate::cache::AssetSource)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Network error: {0}")]
    Network(String),
}
