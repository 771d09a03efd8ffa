//! Controls panel - model choice, base color, image upload and view settings

use glam::Vec2;
use preview_core::{Color, ModelKind, TEXTURE_SIZE};

use crate::app::Controller;
use crate::config::{SharedConfig, UiTheme};
use crate::state::{AppAction, SharedAppState};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];
/// Side of the print area thumbnail, in points
const THUMBNAIL_SIZE: f32 = 120.0;

pub struct ControlsPanel {
    /// Last model the user picked, shown checked while it loads
    selected: Option<ModelKind>,
}

impl ControlsPanel {
    pub fn new(initial: Option<ModelKind>) -> Self {
        Self { selected: initial }
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        app_state: &SharedAppState,
        controller: &Controller,
        config: &SharedConfig,
    ) {
        ui.heading("Product");
        for kind in ModelKind::ALL {
            if ui.radio(self.selected == Some(kind), kind.name()).clicked() {
                self.selected = Some(kind);
                app_state.lock().queue_action(AppAction::SelectModel(kind));
            }
        }
        if app_state.lock().loading > 0 {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.weak("Loading model…");
            });
        }

        ui.separator();
        ui.heading("Color");
        let color = controller.active_color();
        let [r, g, b] = color.to_array();
        let mut picked = egui::Color32::from_rgb(r, g, b);
        ui.horizontal(|ui| {
            if ui.color_edit_button_srgba(&mut picked).changed() {
                app_state
                    .lock()
                    .queue_action(AppAction::SetColor(Color::rgb(picked.r(), picked.g(), picked.b())));
            }
            ui.monospace(color.to_string());
        });

        ui.separator();
        ui.heading("Image");
        ui.horizontal(|ui| {
            if ui.button("Upload image…").clicked() {
                Self::pick_image(ui.ctx(), app_state);
            }
            if ui
                .add_enabled(controller.has_image(), egui::Button::new("Clear image"))
                .clicked()
            {
                app_state.lock().queue_action(AppAction::ClearImage);
            }
        });
        Self::print_area(ui, controller);

        ui.separator();
        Self::view_settings(ui, config);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn pick_image(_ctx: &egui::Context, app_state: &SharedAppState) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        match std::fs::read(&path) {
            Ok(data) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                app_state
                    .lock()
                    .queue_action(AppAction::UploadImage { name, data });
            }
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}", path, e);
                app_state
                    .lock()
                    .set_error(format!("Could not read {}: {}", path.display(), e));
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn pick_image(ctx: &egui::Context, app_state: &SharedAppState) {
        let app_state = app_state.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(file) = rfd::AsyncFileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
                .await
            {
                let name = file.file_name();
                let data = file.read().await;
                app_state
                    .lock()
                    .queue_action(AppAction::UploadImage { name, data });
                ctx.request_repaint();
            }
        });
    }

    /// Texture thumbnail with the model's printable region outlined and the
    /// current image's footprint filled in
    fn print_area(ui: &mut egui::Ui, controller: &Controller) {
        let Some(kind) = controller.active_model_kind() else {
            return;
        };
        let recipe = kind.recipe();
        let image_size = controller
            .state()
            .active_image
            .map(|image| image.dimensions());

        let (frame, response) = ui.allocate_exact_size(
            egui::vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE),
            egui::Sense::hover(),
        );
        let painter = ui.painter_at(frame);
        let visuals = ui.visuals();
        painter.rect_filled(frame, 2.0, visuals.extreme_bg_color);

        let area = thumbnail_rect(frame, recipe.print_area());
        let accent = visuals.selection.bg_fill;
        if let Some(covered) = image_size.and_then(|(w, h)| recipe.device_rect(w, h)) {
            painter.rect_filled(thumbnail_rect(frame, covered), 0.0, accent.gamma_multiply(0.6));
        }
        painter.rect_stroke(area, 0.0, egui::Stroke::new(1.0, accent));

        response.on_hover_text(format!("Print area on the {} texture", kind.name()));
    }

    fn view_settings(ui: &mut egui::Ui, config: &SharedConfig) {
        egui::CollapsingHeader::new("View")
            .default_open(false)
            .show(ui, |ui| {
                let mut app_config = config.read().config().clone();
                let before = app_config.clone();

                ui.checkbox(&mut app_config.viewport.auto_rotate, "Auto-rotate");
                ui.add(
                    egui::Slider::new(&mut app_config.viewport.fov_degrees, 20.0..=90.0)
                        .text("Field of view"),
                );
                ui.horizontal(|ui| {
                    ui.label("Theme");
                    ui.selectable_value(&mut app_config.ui.theme, UiTheme::Dark, "Dark");
                    ui.selectable_value(&mut app_config.ui.theme, UiTheme::Light, "Light");
                });

                let mut manager = config.write();
                if ui
                    .button("Reset settings")
                    .on_hover_text(manager.config_file_path().display().to_string())
                    .clicked()
                {
                    manager.reset_to_defaults();
                    app_config = manager.config().clone();
                } else if app_config != before {
                    *manager.config_mut() = app_config.clone();
                }

                if app_config.ui.theme != before.ui.theme {
                    ui.ctx().set_visuals(app_config.ui.theme.visuals());
                }
                if manager.is_dirty()
                    && let Err(e) = manager.save()
                {
                    tracing::warn!("Failed to save config: {}", e);
                }
            });
    }
}

/// Map a texture-space `(min, max)` rectangle into `frame`
fn thumbnail_rect(frame: egui::Rect, (min, max): (Vec2, Vec2)) -> egui::Rect {
    let scale = frame.width() / TEXTURE_SIZE as f32;
    let to_frame = |p: Vec2| frame.min + egui::vec2(p.x, p.y) * scale;
    egui::Rect::from_min_max(to_frame(min), to_frame(max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(128.0, 128.0))
    }

    #[test]
    fn test_whole_texture_fills_frame() {
        let size = TEXTURE_SIZE as f32;
        let rect = thumbnail_rect(frame(), (Vec2::ZERO, Vec2::splat(size)));
        assert_eq!(rect, frame());
    }

    #[test]
    fn test_cushion_print_area_in_thumbnail() {
        // 100..1900 of 2048 at 1/16 scale
        let rect = thumbnail_rect(frame(), ModelKind::Cushion.recipe().print_area());
        assert_eq!(rect.min, egui::pos2(16.25, 26.25));
        assert_eq!(rect.max, egui::pos2(128.75, 138.75));
    }

    #[test]
    fn test_wide_image_sits_inside_cup_print_area() {
        let recipe = ModelKind::Cup.recipe();
        let area = thumbnail_rect(frame(), recipe.print_area());
        let covered = thumbnail_rect(frame(), recipe.device_rect(400, 100).unwrap());
        assert!(area.contains_rect(covered));
        assert_eq!(covered.left(), area.left());
        assert_eq!(covered.right(), area.right());
    }
}
