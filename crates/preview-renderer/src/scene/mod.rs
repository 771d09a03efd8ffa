//! Scene management for renderable objects.
//!
//! The scene is what the preview controller drives: meshes come and go as
//! models are selected, and each mesh carries the last material bound to it.

mod bounds;
mod render_object;

pub use bounds::*;
pub use render_object::*;

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;
use preview_core::{Mesh, SceneHost};
use uuid::Uuid;

/// Scene containing all renderable objects and their materials.
pub struct Scene {
    objects: HashMap<Uuid, RenderObject>,
    materials: HashMap<Uuid, Material>,
    next_generation: u64,
    dirty: bool,
    redraw_requested: bool,
}

impl Scene {
    /// Creates a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            materials: HashMap::new(),
            next_generation: 1,
            dirty: false,
            redraw_requested: false,
        }
    }

    /// Returns true if the scene has been modified since last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the scene as clean (called after rendering).
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Returns and clears a pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Adds an object to the scene.
    pub fn add_object(&mut self, object: RenderObject) -> Uuid {
        let id = object.id;
        self.objects.insert(id, object);
        self.dirty = true;
        id
    }

    /// Removes an object and its material from the scene.
    pub fn remove_object(&mut self, id: Uuid) -> Option<RenderObject> {
        self.materials.remove(&id);
        self.dirty = true;
        self.objects.remove(&id)
    }

    /// Returns true if the scene contains an object with the given ID.
    pub fn contains(&self, id: Uuid) -> bool {
        self.objects.contains_key(&id)
    }

    /// Returns the number of objects in the scene.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns an iterator over all objects.
    pub fn objects(&self) -> impl Iterator<Item = &RenderObject> {
        self.objects.values()
    }

    /// Replace the material of `id`. The object does not have to be in the
    /// scene yet.
    pub fn set_material(&mut self, id: Uuid, texture: Arc<RgbaImage>) {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.materials.insert(id, Material { texture, generation });
        self.dirty = true;
    }

    /// Material currently bound to `id`.
    pub fn material(&self, id: Uuid) -> Option<&Material> {
        self.materials.get(&id)
    }

    /// Computes the bounding box of all visible objects.
    pub fn compute_bounds(&self) -> Option<BoundingBox> {
        self.objects
            .values()
            .filter(|obj| obj.visible)
            .map(|obj| obj.world_bounds())
            .reduce(|a, b| a.union(&b))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneHost for Scene {
    fn add_mesh(&mut self, mesh: &Arc<Mesh>) {
        tracing::debug!(mesh = %mesh.id, name = %mesh.name, "Adding mesh to scene");
        self.add_object(RenderObject::new(Arc::clone(mesh)));
    }

    fn remove_mesh(&mut self, mesh_id: Uuid) {
        if self.remove_object(mesh_id).is_none() {
            tracing::warn!(mesh = %mesh_id, "Removing mesh that is not in the scene");
        }
    }

    fn bind_material(&mut self, mesh_id: Uuid, texture: Arc<RgbaImage>) {
        self.set_material(mesh_id, texture);
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }
}
