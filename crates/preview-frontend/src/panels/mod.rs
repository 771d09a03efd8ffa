//! UI panels

mod controls;
mod viewport;

pub use controls::ControlsPanel;
pub use viewport::ViewportPanel;
