//! Main application

use std::rc::Rc;
use std::sync::Arc;

use parking_lot::Mutex;
use preview_core::{ModelCache, PreviewController};
use preview_renderer::Scene;

#[cfg(target_arch = "wasm32")]
use crate::assets::FetchAssetSource;
#[cfg(not(target_arch = "wasm32"))]
use crate::assets::FileAssetSource;
use crate::config::{SharedConfig, create_shared_config};
use crate::panels::{ControlsPanel, ViewportPanel};
use crate::state::{AppAction, AppState, SharedAppState};
use crate::tasks::TaskRunner;

#[cfg(not(target_arch = "wasm32"))]
type Source = FileAssetSource;
#[cfg(target_arch = "wasm32")]
type Source = FetchAssetSource;

/// Preview controller driving the app's scene
pub type Controller = PreviewController<Source, Scene>;

/// Configuration and controller, built before the render loop starts
pub struct Startup {
    config: SharedConfig,
    controller: Rc<Controller>,
}

impl Startup {
    /// Read the saved configuration and wire source, cache and controller
    pub fn new() -> Self {
        Self::with_config(create_shared_config())
    }

    pub fn with_config(config: SharedConfig) -> Self {
        let app_config = config.read().config().clone();

        #[cfg(not(target_arch = "wasm32"))]
        let source = FileAssetSource::new(&app_config.assets_root);
        #[cfg(target_arch = "wasm32")]
        let source = FetchAssetSource;

        let cache = Arc::new(ModelCache::with_config(source, &app_config.preview));
        let controller = Rc::new(PreviewController::new(
            cache,
            Scene::new(),
            app_config.preview,
        ));
        Self { config, controller }
    }

    /// Apply the configured initial model selection. Entry points await
    /// this before handing the startup to the runner.
    pub async fn load_initial_model(&self) {
        let initial = self.config.read().config().preview.initial_model;
        self.controller
            .initialize(initial.map(|kind| kind.id()))
            .await;
    }
}

impl Default for Startup {
    fn default() -> Self {
        Self::new()
    }
}

/// Product previewer application
pub struct PreviewApp {
    controller: Rc<Controller>,
    app_state: SharedAppState,
    config: SharedConfig,
    tasks: TaskRunner,
    controls: ControlsPanel,
    viewport: ViewportPanel,
}

impl PreviewApp {
    pub fn new(cc: &eframe::CreationContext<'_>, startup: Startup) -> Self {
        let Startup { config, controller } = startup;
        cc.egui_ctx
            .set_visuals(config.read().config().ui.theme.visuals());

        tracing::info!("Product previewer ready");

        Self {
            controls: ControlsPanel::new(controller.active_model_kind()),
            controller,
            app_state: Arc::new(Mutex::new(AppState::default())),
            config,
            tasks: TaskRunner::new(cc.egui_ctx.clone()),
            viewport: ViewportPanel::new(),
        }
    }

    /// Apply queued input events in the order they were raised
    fn process_actions(&mut self) {
        let actions = self.app_state.lock().take_actions();
        for action in actions {
            match action {
                AppAction::SelectModel(kind) => {
                    let controller = Rc::clone(&self.controller);
                    let app_state = Arc::clone(&self.app_state);
                    app_state.lock().loading += 1;
                    self.tasks.spawn(async move {
                        let result = controller.select_model(kind.id()).await;
                        let mut state = app_state.lock();
                        state.loading = state.loading.saturating_sub(1);
                        match result {
                            Ok(()) => state.clear_status(),
                            Err(e) => state.set_error(e),
                        }
                    });
                }
                AppAction::UploadImage { name, data } => {
                    match self.controller.upload_image(&data) {
                        Ok(()) => {
                            tracing::debug!("Applied image {}", name);
                            self.app_state.lock().clear_status();
                        }
                        Err(e) => self.app_state.lock().set_error(format!("{}: {}", name, e)),
                    }
                }
                AppAction::ClearImage => self.controller.clear_image(),
                AppAction::SetColor(color) => self.controller.set_color_value(color),
            }
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.tasks.poll();
        self.process_actions();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let state = self.app_state.lock();
            match &state.status {
                Some(message) => {
                    ui.colored_label(ui.visuals().error_fg_color, message);
                }
                None => {
                    let model = self
                        .controller
                        .active_model_kind()
                        .map_or("No model", |kind| kind.name());
                    ui.weak(format!("{} · {}", model, self.controller.active_color()));
                }
            }
        });

        egui::SidePanel::left("controls")
            .resizable(false)
            .min_width(180.0)
            .show(ctx, |ui| {
                self.controls
                    .ui(ui, &self.app_state, &self.controller, &self.config);
            });

        let settings = self.config.read().config().viewport.clone();
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.viewport
                    .ui(ui, frame.wgpu_render_state(), &self.controller, &settings);
            });
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use parking_lot::RwLock;
    use preview_core::ModelKind;

    use crate::config::ConfigManager;

    fn scratch_config(initial: Option<ModelKind>) -> SharedConfig {
        let path = std::env::temp_dir()
            .join(format!("product-preview-test-{}", uuid::Uuid::new_v4()))
            .join("config.ron");
        let mut manager = ConfigManager::with_path(path);
        let config = manager.config_mut();
        config.assets_root = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets").to_string();
        config.preview.initial_model = initial;
        Arc::new(RwLock::new(manager))
    }

    #[test]
    fn test_initial_model_is_loaded_during_startup() {
        let startup = Startup::with_config(scratch_config(Some(ModelKind::Cushion)));
        assert!(startup.controller.host().is_empty());

        block_on(startup.load_initial_model());

        assert_eq!(startup.controller.active_model_kind(), Some(ModelKind::Cushion));
        let scene = startup.controller.host();
        assert_eq!(scene.len(), 1);
        let object = scene.objects().next().unwrap();
        assert!(scene.material(object.id).is_some());
    }

    #[test]
    fn test_startup_without_initial_model_keeps_scene_empty() {
        let startup = Startup::with_config(scratch_config(None));
        block_on(startup.load_initial_model());

        assert!(startup.controller.active_model_kind().is_none());
        assert!(startup.controller.host().is_empty());
    }
}
