//! Preview state controller
//!
//! Reacts to the three input events (model select, image upload, color
//! change) and keeps the scene consistent with them. State is only touched
//! once everything an event needs is ready, so the render loop never sees a
//! half-applied update.
//!
//! Model selections may overlap. By default the selection whose load
//! finishes last decides what is shown; with
//! [`PreviewConfig::sequence_model_requests`] only the newest selection is
//! applied.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbaImage;
use parking_lot::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::cache::{AssetSource, LoadedModel, ModelCache};
use crate::color::Color;
use crate::compositor::composite;
use crate::config::PreviewConfig;
use crate::error::PreviewError;
use crate::mesh::Mesh;
use crate::model::ModelKind;

/// Decoded user image shared between the state and compositing passes
pub type SourceImage = Arc<RgbaImage>;

/// The scene the controller drives
pub trait SceneHost {
    /// Attach a mesh to the scene
    fn add_mesh(&mut self, mesh: &Arc<Mesh>);

    /// Detach a mesh from the scene
    fn remove_mesh(&mut self, mesh_id: Uuid);

    /// Use `texture` as the surface material of a mesh
    fn bind_material(&mut self, mesh_id: Uuid, texture: Arc<RgbaImage>);

    /// Ask the render loop for a new frame
    fn request_redraw(&mut self) {}
}

/// What the user currently has selected
#[derive(Debug, Clone, Default)]
pub struct PreviewState {
    pub active_model: Option<LoadedModel>,
    pub active_image: Option<SourceImage>,
    pub active_color: Color,
}

/// Owns the preview state and applies input events to the scene
pub struct PreviewController<S, H> {
    cache: Arc<ModelCache<S>>,
    state: Mutex<PreviewState>,
    host: Mutex<H>,
    config: PreviewConfig,
    latest_selection: AtomicU64,
}

impl<S: AssetSource + 'static, H: SceneHost> PreviewController<S, H> {
    pub fn new(cache: Arc<ModelCache<S>>, host: H, config: PreviewConfig) -> Self {
        let state = PreviewState {
            active_color: config.default_color,
            ..Default::default()
        };
        Self {
            cache,
            state: Mutex::new(state),
            host: Mutex::new(host),
            config,
            latest_selection: AtomicU64::new(0),
        }
    }

    /// Startup: apply the initial selection, if any, before the first frame.
    ///
    /// A failed initial load is logged and leaves an empty scene.
    pub async fn initialize(&self, initial: Option<&str>) {
        let Some(id) = initial else {
            tracing::debug!("No initial model selected");
            return;
        };
        if let Err(e) = self.select_model(id).await {
            tracing::error!("Initial model selection failed: {}", e);
        }
    }

    /// Model select: load (or reuse) the model and swap it into the scene
    pub async fn select_model(&self, id: &str) -> Result<(), PreviewError> {
        let kind = id.parse::<ModelKind>().inspect_err(|e| {
            tracing::warn!("Ignoring model selection: {}", e);
        })?;

        let ticket = self.latest_selection.fetch_add(1, Ordering::Relaxed) + 1;
        let loaded = self.cache.get_or_load(kind).await.inspect_err(|e| {
            tracing::warn!("Keeping current model: {}", e);
        })?;

        if self.config.sequence_model_requests
            && self.latest_selection.load(Ordering::Relaxed) != ticket
        {
            tracing::debug!(model = %kind, "Discarding superseded model selection");
            return Ok(());
        }

        let mut state = self.state.lock();
        let mut host = self.host.lock();

        let previous = state.active_model.as_ref().map(|m| m.mesh.id);
        let swapping = previous != Some(loaded.mesh.id);
        if swapping && let Some(previous) = previous {
            host.remove_mesh(previous);
        }

        let texture = composite(kind, state.active_color, state.active_image.as_deref());
        host.bind_material(loaded.mesh.id, Arc::new(texture));
        if swapping {
            host.add_mesh(&loaded.mesh);
        }
        host.request_redraw();

        tracing::info!(model = %kind, "Model selected");
        state.active_model = Some(loaded);
        Ok(())
    }

    /// Image upload: decode `bytes` and use it for the active model.
    ///
    /// Undecodable data leaves the current image in place.
    pub fn upload_image(&self, bytes: &[u8]) -> Result<(), PreviewError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| PreviewError::ImageDecode(e.to_string()))
            .inspect_err(|e| tracing::warn!("Keeping current image: {}", e))?
            .into_rgba8();

        tracing::info!(width = image.width(), height = image.height(), "Image uploaded");
        let mut state = self.state.lock();
        state.active_image = Some(Arc::new(image));
        self.refresh(&state);
        Ok(())
    }

    /// Drop the uploaded image and show the plain base color
    pub fn clear_image(&self) {
        let mut state = self.state.lock();
        if state.active_image.take().is_some() {
            tracing::info!("Image cleared");
            self.refresh(&state);
        }
    }

    /// Color change from a color string such as `#rrggbb`
    pub fn set_color(&self, value: &str) -> Result<(), PreviewError> {
        let color = value
            .parse::<Color>()
            .inspect_err(|e| tracing::warn!("Keeping current color: {}", e))?;
        self.set_color_value(color);
        Ok(())
    }

    /// Color change; every call redraws so dragging a picker previews live
    pub fn set_color_value(&self, color: Color) {
        let mut state = self.state.lock();
        state.active_color = color;
        self.refresh(&state);
    }

    /// Recomposite the active model's material from the current state
    fn refresh(&self, state: &PreviewState) {
        let Some(model) = &state.active_model else {
            return;
        };
        let texture = composite(model.kind, state.active_color, state.active_image.as_deref());

        let mut host = self.host.lock();
        host.bind_material(model.mesh.id, Arc::new(texture));
        host.request_redraw();
    }

    pub fn active_model_kind(&self) -> Option<ModelKind> {
        self.state.lock().active_model.as_ref().map(|m| m.kind)
    }

    pub fn active_color(&self) -> Color {
        self.state.lock().active_color
    }

    pub fn has_image(&self) -> bool {
        self.state.lock().active_image.is_some()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> PreviewState {
        self.state.lock().clone()
    }

    /// Run `f` with the scene locked
    pub fn with_host<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(&mut self.host.lock())
    }

    /// Lock the scene for the duration of the returned guard
    pub fn host(&self) -> MutexGuard<'_, H> {
        self.host.lock()
    }

    pub fn cache(&self) -> &Arc<ModelCache<S>> {
        &self.cache
    }
}
