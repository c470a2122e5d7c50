//! Capability traits for the browser APIs each context calls into.
//!
//! The concrete browser binding implements these; tests and the CLI
//! simulation use in-memory versions.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Browser tab identifier.
pub type TabId = i64;

/// Frame identifier within a tab; `0` is the top-level frame.
pub type FrameId = i64;

/// URL prefixes that must never receive an injected script.
pub const PRIVILEGED_URL_PREFIXES: &[&str] = &["chrome://", "chrome-extension://", "moz-extension://"];

/// Whether a URL belongs to the browser itself or to an extension.
pub fn is_privileged_url(url: &str) -> bool {
    PRIVILEGED_URL_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

/// Errors surfaced by host capabilities.
#[derive(Debug, Error)]
pub enum HostError {
    /// The tab does not exist (closed or never opened).
    #[error("Tab {0} not found")]
    TabNotFound(TabId),

    /// Nothing is listening on the other end of a message send.
    #[error("No receiver for message: {0}")]
    NoReceiver(String),

    /// The browser refused to run the content script.
    #[error("Script injection failed: {0}")]
    ScriptInjection(String),

    /// Local storage read/write failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An in-process channel was closed.
    #[error("Channel closed")]
    ChannelClosed,
}

/// Snapshot of a browser tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub id: TabId,
    pub url: Option<String>,
    pub active: bool,
}

/// Tab queries and tab-addressed messaging.
#[async_trait]
pub trait TabsApi: Send + Sync {
    async fn get(&self, tab_id: TabId) -> Result<TabInfo, HostError>;

    /// Every open tab.
    async fn query_all(&self) -> Result<Vec<TabInfo>, HostError>;

    /// The active tab of the current window, if any.
    async fn query_active(&self) -> Result<Option<TabInfo>, HostError>;

    /// Send a message to the scripts of one tab and wait for the reply.
    async fn send_message(&self, tab_id: TabId, message: Value) -> Result<Value, HostError>;
}

/// Content script injection.
#[async_trait]
pub trait ScriptingApi: Send + Sync {
    async fn execute_script(&self, tab_id: TabId, file: &str) -> Result<(), HostError>;
}

/// The extension-wide runtime message bus.
#[async_trait]
pub trait RuntimeBus: Send + Sync {
    async fn send(&self, message: Value) -> Result<(), HostError>;
}

/// Extension local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), HostError>;
    async fn remove(&self, key: &str) -> Result<(), HostError>;
}
