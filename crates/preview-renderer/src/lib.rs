//! Product Preview Renderer
//!
//! Scene state and its wgpu renderer.
//!
//! - [`scene::Scene`] - meshes and their materials; the controller's scene host
//! - [`camera::OrbitCamera`] - orbit/zoom camera around the model
//! - [`gpu::SceneRenderer`] - draws the scene with a depth buffer

pub mod camera;
pub mod gpu;
pub mod scene;

pub use camera::OrbitCamera;
pub use gpu::SceneRenderer;
pub use scene::{BoundingBox, Material, RenderObject, Scene};
