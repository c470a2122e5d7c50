//! Side panel UI surface and its in-memory implementation.

use pagecue_core::AppMode;
use std::sync::{Arc, Mutex};

/// The parts of the side panel UI the binder drives.
pub trait PanelView: Send + Sync {
    fn app_mode(&self) -> AppMode;
    fn set_app_mode(&self, mode: AppMode);

    /// Replace the content of the chat input control.
    fn set_input(&self, text: &str);

    /// Restart the pulse animation on the submit control.
    fn restart_highlight(&self);
    fn clear_highlight(&self);
}

#[derive(Debug)]
struct PanelState {
    mode: AppMode,
    inputs: Vec<String>,
    highlighted: bool,
    highlight_restarts: usize,
}

/// Panel that records what it was told to display.
#[derive(Debug, Clone)]
pub struct MemoryPanel {
    state: Arc<Mutex<PanelState>>,
}

impl MemoryPanel {
    pub fn new(mode: AppMode) -> Self {
        Self {
            state: Arc::new(Mutex::new(PanelState {
                mode,
                inputs: Vec::new(),
                highlighted: false,
                highlight_restarts: 0,
            })),
        }
    }

    /// Current input content.
    pub fn input(&self) -> Option<String> {
        self.state.lock().ok()?.inputs.last().cloned()
    }

    /// Every value written to the input, oldest first.
    pub fn inputs(&self) -> Vec<String> {
        self.state.lock().map(|s| s.inputs.clone()).unwrap_or_default()
    }

    pub fn is_highlighted(&self) -> bool {
        self.state.lock().map(|s| s.highlighted).unwrap_or(false)
    }

    pub fn highlight_restarts(&self) -> usize {
        self.state.lock().map(|s| s.highlight_restarts).unwrap_or(0)
    }
}

impl Default for MemoryPanel {
    fn default() -> Self {
        Self::new(AppMode::Chat)
    }
}

impl PanelView for MemoryPanel {
    fn app_mode(&self) -> AppMode {
        self.state.lock().map(|s| s.mode).unwrap_or(AppMode::Other)
    }

    fn set_app_mode(&self, mode: AppMode) {
        if let Ok(mut state) = self.state.lock() {
            state.mode = mode;
        }
    }

    fn set_input(&self, text: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.inputs.push(text.to_string());
        }
    }

    fn restart_highlight(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.highlighted = true;
            state.highlight_restarts += 1;
        }
    }

    fn clear_highlight(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.highlighted = false;
        }
    }
}
