//! wgpu rendering of the scene.
//!
//! Meshes are drawn with a depth buffer into a caller-provided color target;
//! the frontend shows that target as an egui texture.

mod renderer;
mod resources;
mod vertex;

pub use renderer::{CameraUniform, ObjectUniform, SceneRenderer};
pub use resources::{DEPTH_FORMAT, MATERIAL_FORMAT, depth_stencil_state};
pub use vertex::{MeshVertex, mesh_vertices};
