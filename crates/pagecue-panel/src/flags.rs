//! Short-lived flags other extension pages leave for the panel.

use pagecue_core::{HostError, KeyValueStore};
use serde_json::Value;

/// Prompt queued before the panel was opened.
pub const PENDING_PROMPT: &str = "pendingPrompt";

/// Request to open the panel directly in agent mode.
pub const SWITCH_TO_AGENT_MODE: &str = "switchToAgentMode";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelFlags {
    pub switch_to_agent: bool,
    pub pending_prompt: Option<String>,
}

impl PanelFlags {
    /// Read both flags and remove the ones that were set.
    pub async fn take(store: &dyn KeyValueStore) -> Result<Self, HostError> {
        let mut flags = PanelFlags::default();

        if store.get(SWITCH_TO_AGENT_MODE).await?.as_ref().is_some_and(is_truthy) {
            flags.switch_to_agent = true;
            store.remove(SWITCH_TO_AGENT_MODE).await?;
        }

        if let Some(Value::String(prompt)) = store.get(PENDING_PROMPT).await? {
            if !prompt.is_empty() {
                flags.pending_prompt = Some(prompt);
                store.remove(PENDING_PROMPT).await?;
            }
        }

        Ok(flags)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
