//! Render object and material definitions.

use std::sync::Arc;

use glam::Mat4;
use image::RgbaImage;
use preview_core::Mesh;
use uuid::Uuid;

use super::BoundingBox;

/// A mesh placed in the scene.
#[derive(Debug, Clone)]
pub struct RenderObject {
    /// Same as the mesh id.
    pub id: Uuid,

    /// Shared geometry, owned by the model cache.
    pub mesh: Arc<Mesh>,

    /// World transform matrix.
    pub transform: Mat4,

    /// Whether this object is visible.
    pub visible: bool,

    /// Local bounding box (before transform).
    pub bounds: BoundingBox,
}

impl RenderObject {
    /// Creates a render object for `mesh` at the origin.
    pub fn new(mesh: Arc<Mesh>) -> Self {
        Self {
            id: mesh.id,
            bounds: BoundingBox::from_mesh(&mesh),
            mesh,
            transform: Mat4::IDENTITY,
            visible: true,
        }
    }

    /// Sets the transform matrix.
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Returns the world-space bounding box.
    pub fn world_bounds(&self) -> BoundingBox {
        self.bounds.transform(&self.transform)
    }
}

/// Surface texture bound to a mesh.
///
/// `generation` changes on every bind, so consumers holding a GPU copy know
/// when to upload again.
#[derive(Debug, Clone)]
pub struct Material {
    pub texture: Arc<RgbaImage>,
    pub generation: u64,
}
