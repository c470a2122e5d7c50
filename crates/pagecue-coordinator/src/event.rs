//! Events consumed by the coordinator loop.

use pagecue_core::{FrameId, HostError, TabId};
use serde_json::Value;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatorEvent {
    /// Extension started: inject into every eligible open tab.
    Startup,
    /// A navigation committed in `frame_id` of `tab_id`.
    NavigationCommitted { tab_id: TabId, frame_id: FrameId },
    TabClosed(TabId),
    /// Raw message received on the runtime bus.
    Runtime(Value),
    /// Settle delay elapsed for a scheduled injection.
    InjectDue(TabId),
    Shutdown,
}

/// Cloneable sender used by the browser glue to feed the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    sender: mpsc::UnboundedSender<CoordinatorEvent>,
}

impl CoordinatorHandle {
    pub(crate) fn new(sender: mpsc::UnboundedSender<CoordinatorEvent>) -> Self {
        Self { sender }
    }

    pub fn send(&self, event: CoordinatorEvent) -> Result<(), HostError> {
        self.sender.send(event).map_err(|_| HostError::ChannelClosed)
    }

    pub fn startup(&self) -> Result<(), HostError> {
        self.send(CoordinatorEvent::Startup)
    }

    pub fn navigation_committed(&self, tab_id: TabId, frame_id: FrameId) -> Result<(), HostError> {
        self.send(CoordinatorEvent::NavigationCommitted { tab_id, frame_id })
    }

    pub fn tab_closed(&self, tab_id: TabId) -> Result<(), HostError> {
        self.send(CoordinatorEvent::TabClosed(tab_id))
    }

    pub fn runtime_message(&self, message: Value) -> Result<(), HostError> {
        self.send(CoordinatorEvent::Runtime(message))
    }

    pub fn shutdown(&self) -> Result<(), HostError> {
        self.send(CoordinatorEvent::Shutdown)
    }
}
