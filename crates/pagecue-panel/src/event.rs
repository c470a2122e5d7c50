//! Events consumed by the panel loop.

use pagecue_core::{AppMode, HostError};
use serde_json::Value;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// Raw message received on the runtime bus.
    Runtime(Value),
    /// The user switched the panel's mode.
    ModeChanged(AppMode),
    /// Fill settle delay elapsed for pending generation `generation`.
    FillDue { generation: u64 },
    HighlightDue { generation: u64 },
    HighlightExpired { generation: u64 },
    Close,
}

#[derive(Debug, Clone)]
pub struct PanelHandle {
    sender: mpsc::UnboundedSender<PanelEvent>,
}

impl PanelHandle {
    pub(crate) fn new(sender: mpsc::UnboundedSender<PanelEvent>) -> Self {
        Self { sender }
    }

    pub fn send(&self, event: PanelEvent) -> Result<(), HostError> {
        self.sender.send(event).map_err(|_| HostError::ChannelClosed)
    }

    pub fn runtime_message(&self, message: Value) -> Result<(), HostError> {
        self.send(PanelEvent::Runtime(message))
    }

    pub fn mode_changed(&self, mode: AppMode) -> Result<(), HostError> {
        self.send(PanelEvent::ModeChanged(mode))
    }

    pub fn close(&self) -> Result<(), HostError> {
        self.send(PanelEvent::Close)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
