//! In-memory host capabilities.
//!
//! Used by the CLI simulation and by tests in every context crate.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::debug;

use crate::host::{HostError, KeyValueStore, RuntimeBus};

/// Default capacity of the runtime bus.
pub const DEFAULT_BUS_CAPACITY: usize = 64;

/// Key/value store backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous read, for assertions.
    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| HostError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| HostError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), HostError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| HostError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// Runtime bus that fans every message out to all subscribers.
///
/// A send with no subscriber fails with [`HostError::NoReceiver`], the same
/// way the browser rejects a message when no extension page is listening.
#[derive(Debug, Clone)]
pub struct MemoryBus {
    sender: broadcast::Sender<Value>,
}

impl MemoryBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Value> {
        self.sender.subscribe()
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

#[async_trait]
impl RuntimeBus for MemoryBus {
    async fn send(&self, message: Value) -> Result<(), HostError> {
        match self.sender.send(message) {
            Ok(receivers) => {
                debug!(receivers, "Runtime message delivered");
                Ok(())
            }
            Err(broadcast::error::SendError(message)) => {
                Err(HostError::NoReceiver(message.to_string()))
            }
        }
    }
}
