//! Previewable product models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PreviewError;

/// A product that can be previewed.
///
/// The set is closed: every variant ships with a model asset and a
/// compositing recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Cup,
    Cushion,
}

impl ModelKind {
    /// Every previewable model, in display order
    pub const ALL: [ModelKind; 2] = [ModelKind::Cup, ModelKind::Cushion];

    /// Identifier used in asset paths and input events
    pub fn id(&self) -> &'static str {
        match self {
            ModelKind::Cup => "cup",
            ModelKind::Cushion => "cushion",
        }
    }

    /// Human readable name
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Cup => "Cup",
            ModelKind::Cushion => "Cushion",
        }
    }

    /// Asset path of this model: `<base>/<id>.<extension>`
    pub fn asset_path(&self, base: &str, extension: &str) -> String {
        let base = base.trim_end_matches('/');
        if base.is_empty() {
            format!("{}.{}", self.id(), extension)
        } else {
            format!("{}/{}.{}", base, self.id(), extension)
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelKind {
    type Err = PreviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| PreviewError::UnknownModel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_models() {
        assert_eq!("cup".parse::<ModelKind>().unwrap(), ModelKind::Cup);
        assert_eq!("cushion".parse::<ModelKind>().unwrap(), ModelKind::Cushion);
    }

    #[test]
    fn test_parse_unknown_model() {
        let result = "teapot".parse::<ModelKind>();
        assert!(matches!(result, Err(PreviewError::UnknownModel(id)) if id == "teapot"));

        // Identifiers are exact, not case folded
        assert!("Cup".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_asset_path() {
        assert_eq!(ModelKind::Cup.asset_path("models", "obj"), "models/cup.obj");
        assert_eq!(
            ModelKind::Cushion.asset_path("/static/models/", "obj"),
            "/static/models/cushion.obj"
        );
        assert_eq!(ModelKind::Cup.asset_path("", "obj"), "cup.obj");
    }
}
