//! Cross-context message protocol.
//!
//! Two closed message families travel over the host's messaging channel as
//! JSON values:
//! - `ToastCommand`: coordinator → content script, tagged by `action` and
//!   stamped with [`TOAST_SOURCE`]
//! - `RuntimeMessage`: content script / panel → runtime bus, tagged by `type`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Source tag the content script requires on coordinator commands.
pub const TOAST_SOURCE: &str = "PromptToastService";

/// Commands sent by the coordinator to an injected content script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToastCommand {
    CheckAndShow,
    HideButtons,
}

impl ToastCommand {
    /// Wire form, including the source tag.
    pub fn to_value(self) -> Value {
        serde_json::json!({
            "action": self,
            "source": TOAST_SOURCE,
        })
    }
}

/// How a content script should treat an incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundToastRequest {
    /// Not addressed to the toast script; no reply is sent.
    Foreign,
    Command(ToastCommand),
    /// Correct source, unrecognized action.
    Unknown(String),
}

impl InboundToastRequest {
    /// Classify a raw message received by the content script.
    pub fn classify(message: &Value) -> Self {
        if message.get("source").and_then(Value::as_str) != Some(TOAST_SOURCE) {
            return InboundToastRequest::Foreign;
        }
        let action = message.get("action").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<ToastCommand>(action.clone()) {
            Ok(command) => InboundToastRequest::Command(command),
            Err(_) => InboundToastRequest::Unknown(
                action.as_str().map(str::to_string).unwrap_or_else(|| action.to_string()),
            ),
        }
    }
}

/// Reply from the content script to a coordinator command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastAck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToastAck {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn unknown_action() -> Self {
        Self {
            success: false,
            error: Some("Unknown action".to_string()),
        }
    }
}

/// Messages broadcast on the extension runtime bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeMessage {
    /// Ask the side panel to put `prompt` in its input.
    FillPromptInput { prompt: String },
    /// Ask the coordinator to dismiss the buttons on the active tab.
    HidePromptToast,
}

impl RuntimeMessage {
    pub fn to_value(&self) -> Value {
        // Serializing a plain enum into a Value cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Decode a bus message; anything unrecognized yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// Application mode of the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    Chat,
    Agent,
    Teach,
    #[serde(other)]
    Other,
}

impl AppMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AppMode::Chat => "chat",
            AppMode::Agent => "agent",
            AppMode::Teach => "teach",
            AppMode::Other => "other",
        }
    }
}

impl std::fmt::Display for AppMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
