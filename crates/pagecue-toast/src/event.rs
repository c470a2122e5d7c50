//! Events consumed by a content script's loop.

use pagecue_core::{HostError, ToastAck};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::overlay::OverlayId;

#[derive(Debug)]
pub enum ToastEvent {
    /// A message from the coordinator. `reply` is dropped without an answer
    /// when the message is not addressed to this script.
    Command {
        request: Value,
        reply: oneshot::Sender<ToastAck>,
    },
    ButtonClicked { prompt: String },
    /// The page finished loading.
    DocumentReady,
    /// Initial settle delay elapsed.
    SettleElapsed,
    PollTick,
    /// Auto-dismiss timer for group `id` fired.
    AutoDismiss { id: OverlayId },
    FadeOutElapsed { id: OverlayId },
    Unload,
}

/// Cloneable sender side of a content script.
#[derive(Debug, Clone)]
pub struct ToastHandle {
    sender: mpsc::UnboundedSender<ToastEvent>,
}

impl ToastHandle {
    pub(crate) fn new(sender: mpsc::UnboundedSender<ToastEvent>) -> Self {
        Self { sender }
    }

    pub fn send(&self, event: ToastEvent) -> Result<(), HostError> {
        self.sender.send(event).map_err(|_| HostError::ChannelClosed)
    }

    /// Deliver a message and wait for the script's acknowledgement.
    ///
    /// Returns `Ok(None)` when the script ignored the message.
    pub async fn request(&self, message: Value) -> Result<Option<ToastAck>, HostError> {
        let (reply, ack) = oneshot::channel();
        self.send(ToastEvent::Command {
            request: message,
            reply,
        })?;
        Ok(ack.await.ok())
    }

    pub fn click(&self, prompt: impl Into<String>) -> Result<(), HostError> {
        self.send(ToastEvent::ButtonClicked {
            prompt: prompt.into(),
        })
    }

    pub fn document_ready(&self) -> Result<(), HostError> {
        self.send(ToastEvent::DocumentReady)
    }

    pub fn unload(&self) -> Result<(), HostError> {
        self.send(ToastEvent::Unload)
    }

    /// Whether the script's loop has exited.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
