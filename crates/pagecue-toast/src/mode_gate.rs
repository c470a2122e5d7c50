//! Optional gate that only lets buttons show in agent mode.
//!
//! The settings blob is owned by the side panel's settings store. It is
//! persisted as a JSON string, either bare (`{"appMode": "agent"}`) or
//! wrapped (`{"state": {"appMode": "agent"}}`). Every failure fails open.

use pagecue_core::{AppMode, KeyValueStore};
use serde_json::Value;
use tracing::debug;

/// Outcome of reading the stored settings blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredMode {
    /// No blob, or a blob that could not be parsed.
    Unreadable,
    /// Parsed blob; `None` when it carries no `appMode`.
    Parsed(Option<AppMode>),
}

/// Decode the app mode out of a raw settings blob.
pub fn stored_app_mode(raw: &Value) -> StoredMode {
    let parsed = match raw {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => value,
            Err(_) => return StoredMode::Unreadable,
        },
        Value::Object(_) => raw.clone(),
        _ => return StoredMode::Unreadable,
    };

    let settings = parsed.get("state").filter(|s| s.is_object()).unwrap_or(&parsed);
    let mode = settings
        .get("appMode")
        .and_then(|mode| serde_json::from_value::<AppMode>(mode.clone()).ok());
    StoredMode::Parsed(mode)
}

/// Whether the stored mode allows showing prompt buttons.
pub async fn mode_allows_display(store: &dyn KeyValueStore, settings_key: &str) -> bool {
    let raw = match store.get(settings_key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return true,
        Err(e) => {
            debug!(error = %e, "Settings unavailable, allowing display");
            return true;
        }
    };

    match stored_app_mode(&raw) {
        StoredMode::Unreadable => {
            debug!(key = settings_key, "Unparseable settings, allowing display");
            true
        }
        StoredMode::Parsed(mode) => mode == Some(AppMode::Agent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecue_core::MemoryStore;
    use serde_json::json;

    const KEY: &str = "nxtscape-settings";

    #[test]
    fn test_wrapped_and_bare_blobs() {
        assert_eq!(
            stored_app_mode(&json!(r#"{"state":{"appMode":"agent","theme":"dark"}}"#)),
            StoredMode::Parsed(Some(AppMode::Agent))
        );
        assert_eq!(
            stored_app_mode(&json!(r#"{"appMode":"chat"}"#)),
            StoredMode::Parsed(Some(AppMode::Chat))
        );
        assert_eq!(stored_app_mode(&json!(r#"{"theme":"dark"}"#)), StoredMode::Parsed(None));
        assert_eq!(stored_app_mode(&json!("{not json")), StoredMode::Unreadable);
        assert_eq!(stored_app_mode(&json!(42)), StoredMode::Unreadable);
    }

    #[tokio::test]
    async fn test_gate_decisions() {
        let store = MemoryStore::new();
        assert!(mode_allows_display(&store, KEY).await);

        store.set(KEY, json!(r#"{"state":{"appMode":"agent"}}"#)).await.unwrap();
        assert!(mode_allows_display(&store, KEY).await);

        store.set(KEY, json!(r#"{"state":{"appMode":"chat"}}"#)).await.unwrap();
        assert!(!mode_allows_display(&store, KEY).await);

        store.set(KEY, json!(r#"{"state":{}}"#)).await.unwrap();
        assert!(!mode_allows_display(&store, KEY).await);

        store.set(KEY, json!("][")).await.unwrap();
        assert!(mode_allows_display(&store, KEY).await);
    }
}
