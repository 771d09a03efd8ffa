//! Viewport panel - shows the rendered scene and handles orbit/zoom input

use preview_renderer::{OrbitCamera, Scene};
use uuid::Uuid;

use crate::app::Controller;
use crate::config::ViewportConfig;
use crate::viewport_state::ViewportState;

const ORBIT_SPEED: f32 = 0.01;
const ZOOM_SPEED: f32 = 0.01;
/// Radians per second
const AUTO_ROTATE_SPEED: f32 = 0.4;

pub struct ViewportPanel {
    camera: OrbitCamera,
    /// Created on the first frame that has a wgpu render state
    state: Option<ViewportState>,
    /// Object the camera was last framed on
    framed: Option<Uuid>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            camera: OrbitCamera::default(),
            state: None,
            framed: None,
        }
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        render_state: Option<&egui_wgpu::RenderState>,
        controller: &Controller,
        settings: &ViewportConfig,
    ) {
        self.camera.set_fov_degrees(settings.fov_degrees);

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());
        if response.dragged() {
            let delta = response.drag_delta();
            self.camera.orbit(-delta.x * ORBIT_SPEED, -delta.y * ORBIT_SPEED);
        } else if settings.auto_rotate {
            let dt = ui.input(|i| i.stable_dt).min(0.1);
            self.camera.orbit(dt * AUTO_ROTATE_SPEED, 0.0);
            ui.ctx().request_repaint();
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                self.camera.zoom(scroll * ZOOM_SPEED);
            }
        }

        let painter = ui.painter_at(rect);
        let [r, g, b] = settings.background.to_array();
        let background = egui::Color32::from_rgb(r, g, b);

        let Some(render_state) = render_state else {
            painter.rect_filled(rect, 0.0, background);
            Self::centered_text(ui, &painter, rect, "3D rendering is unavailable");
            return;
        };
        let state = self
            .state
            .get_or_insert_with(|| ViewportState::new(render_state));

        let mut scene = controller.host();
        if scene.take_redraw_request() {
            ui.ctx().request_repaint();
        }
        if scene.is_dirty() {
            Self::frame_scene(&mut self.camera, &mut self.framed, &scene);
            scene.mark_clean();
        }
        if scene.is_empty() {
            painter.rect_filled(rect, 0.0, background);
            Self::centered_text(ui, &painter, rect, "No model loaded");
            return;
        }

        let pixels_per_point = ui.ctx().pixels_per_point();
        let width = (rect.width() * pixels_per_point).round() as u32;
        let height = (rect.height() * pixels_per_point).round() as u32;
        let texture_id = state.ensure_texture(width, height, &mut render_state.renderer.write());
        state.render(&scene, &self.camera, clear_color(background));
        drop(scene);

        painter.image(
            texture_id,
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }

    fn centered_text(ui: &egui::Ui, painter: &egui::Painter, rect: egui::Rect, text: &str) {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(16.0),
            ui.visuals().weak_text_color(),
        );
    }

    /// Re-center the camera when the shown model changes
    fn frame_scene(camera: &mut OrbitCamera, framed: &mut Option<Uuid>, scene: &Scene) {
        let shown = scene.objects().next().map(|object| object.id);
        if shown == *framed {
            return;
        }
        *framed = shown;
        if let Some(bounds) = scene.compute_bounds() {
            camera.focus_on(&bounds);
        }
    }
}

impl Default for ViewportPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Render pass clear value for an egui color; the bytes pass through unconverted
fn clear_color(color: egui::Color32) -> wgpu::Color {
    let channel = |c: u8| c as f64 / 255.0;
    wgpu::Color {
        r: channel(color.r()),
        g: channel(color.g()),
        b: channel(color.b()),
        a: 1.0,
    }
}
