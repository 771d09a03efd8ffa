//! Product Previewer Frontend
//!
//! egui application: model, color and image controls beside a live 3D
//! viewport. Runs natively and in the browser.

mod app;
mod assets;
mod config;
mod panels;
mod state;
mod tasks;
mod viewport_state;

pub use app::{PreviewApp, Startup};

/// Browser entry point: attaches the app to the `preview_canvas` element
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
    use wasm_bindgen::JsCast;

    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or("No document object")?;
    let canvas = document
        .get_element_by_id("preview_canvas")
        .ok_or("Missing preview_canvas element")?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;

    // The initial model is in the scene before the first frame
    let startup = Startup::new();
    startup.load_initial_model().await;

    eframe::WebRunner::new()
        .start(
            canvas,
            eframe::WebOptions::default(),
            Box::new(move |cc| Ok(Box::new(PreviewApp::new(cc, startup)))),
        )
        .await
}
