//! Viewport rendering state

use std::sync::Arc;

use preview_renderer::{OrbitCamera, Scene, SceneRenderer};

/// Render texture for viewport
struct RenderTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    egui_texture_id: egui::TextureId,
}

/// GPU side of the viewport: the scene renderer and the texture egui shows
pub struct ViewportState {
    renderer: SceneRenderer,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    render_texture: Option<RenderTexture>,
}

impl ViewportState {
    pub fn new(render_state: &egui_wgpu::RenderState) -> Self {
        let renderer = SceneRenderer::new(&render_state.device, render_state.target_format, 1, 1);
        Self {
            renderer,
            device: Arc::clone(&render_state.device),
            queue: Arc::clone(&render_state.queue),
            render_texture: None,
        }
    }

    /// Ensure the render texture matches the requested size
    pub fn ensure_texture(
        &mut self,
        width: u32,
        height: u32,
        egui_renderer: &mut egui_wgpu::Renderer,
    ) -> egui::TextureId {
        let (width, height) = (width.max(1), height.max(1));

        if let Some(rt) = &self.render_texture {
            let size = rt.texture.size();
            if size.width == width && size.height == height {
                return rt.egui_texture_id;
            }
        }

        if let Some(old) = self.render_texture.take() {
            egui_renderer.free_texture(&old.egui_texture_id);
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Viewport Render Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.renderer.format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let egui_texture_id =
            egui_renderer.register_native_texture(&self.device, &view, wgpu::FilterMode::Linear);

        self.renderer.resize(&self.device, width, height);
        tracing::debug!(width, height, "Viewport render texture resized");

        self.render_texture = Some(RenderTexture {
            texture,
            view,
            egui_texture_id,
        });
        egui_texture_id
    }

    /// Upload scene changes and render it to the texture
    pub fn render(&mut self, scene: &Scene, camera: &OrbitCamera, background: wgpu::Color) {
        let Some(rt) = &self.render_texture else {
            return;
        };

        self.renderer.sync(&self.device, &self.queue, scene);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Viewport Render Encoder"),
            });
        self.renderer
            .render(&mut encoder, &rt.view, &self.queue, camera, background);
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}
