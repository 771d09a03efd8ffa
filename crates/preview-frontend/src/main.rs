//! Product previewer native entry point

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "preview_frontend=debug,preview_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting product previewer");

    // GL backend keeps software rasterizers (llvmpipe) working
    let wgpu_options = egui_wgpu::WgpuConfiguration {
        wgpu_setup: egui_wgpu::WgpuSetup::CreateNew {
            supported_backends: wgpu::Backends::GL,
            power_preference: wgpu::PowerPreference::LowPower,
            device_descriptor: std::sync::Arc::new(|_adapter| wgpu::DeviceDescriptor {
                label: Some("product-preview device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
            }),
        },
        ..Default::default()
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Product Preview"),
        wgpu_options,
        ..Default::default()
    };

    // The initial model is in the scene before the first frame
    let startup = preview_frontend::Startup::new();
    futures::executor::block_on(startup.load_initial_model());

    eframe::run_native(
        "product-preview",
        native_options,
        Box::new(move |cc| Ok(Box::new(preview_frontend::PreviewApp::new(cc, startup)))),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {}
