//! UI-side application state

use std::sync::Arc;

use parking_lot::Mutex;
use preview_core::{Color, ModelKind};

/// Input events raised by the panels, applied by the app once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    SelectModel(ModelKind),
    UploadImage { name: String, data: Vec<u8> },
    ClearImage,
    SetColor(Color),
}

/// Actions waiting to be applied and the status line
#[derive(Debug, Default)]
pub struct AppState {
    pending_actions: Vec<AppAction>,
    /// Last error shown in the status bar
    pub status: Option<String>,
    /// Model selections issued but not yet settled
    pub loading: usize,
}

pub type SharedAppState = Arc<Mutex<AppState>>;

impl AppState {
    pub fn queue_action(&mut self, action: AppAction) {
        self.pending_actions.push(action);
    }

    /// Remove and return queued actions in the order they were raised
    pub fn take_actions(&mut self) -> Vec<AppAction> {
        std::mem::take(&mut self.pending_actions)
    }

    pub fn set_error(&mut self, message: impl ToString) {
        self.status = Some(message.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}
