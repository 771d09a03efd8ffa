//! Product Preview Core
//!
//! This crate contains everything the previewer does that is not drawing to a
//! screen:
//! - ModelKind: the closed set of previewable products
//! - Mesh: OBJ assets parsed into renderable geometry
//! - ModelCache: loads each model at most once per session
//! - compositor: per-model recipes that paint the material texture
//! - PreviewController: keeps scene, texture and color consistent

pub mod cache;
pub mod color;
pub mod compositor;
pub mod config;
pub mod controller;
pub mod error;
pub mod mesh;
pub mod model;

pub use cache::{AssetSource, LoadedModel, ModelCache};
pub use color::Color;
pub use compositor::{DrawRecipe, Rotation, TEXTURE_SIZE, composite, composite_id};
pub use config::PreviewConfig;
pub use controller::{PreviewController, PreviewState, SceneHost, SourceImage};
pub use error::{AssetError, PreviewError};
pub use mesh::{Mesh, MeshError};
pub use model::ModelKind;
