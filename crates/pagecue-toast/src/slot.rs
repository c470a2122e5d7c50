//! One content script per page context.

use tracing::debug;

use crate::event::ToastHandle;

/// Owner of the page's content script instance.
///
/// The coordinator may inject the script more than once into the same page
/// (its bookkeeping is reset on navigation, not on in-page reloads of the
/// bundle). Every load after the first returns the running instance.
#[derive(Debug, Default)]
pub struct ContentScriptSlot {
    handle: Option<ToastHandle>,
}

impl ContentScriptSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the running script, starting one with `load` if there is none.
    pub fn get_or_load<F>(&mut self, load: F) -> ToastHandle
    where
        F: FnOnce() -> ToastHandle,
    {
        if let Some(handle) = self.handle.as_ref().filter(|h| !h.is_closed()) {
            debug!("Content script already loaded in this page");
            return handle.clone();
        }
        let handle = load();
        self.handle = Some(handle.clone());
        handle
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_closed())
    }

    pub fn current(&self) -> Option<&ToastHandle> {
        self.handle.as_ref().filter(|h| !h.is_closed())
    }

    /// Unload the running script, if any. The page context is going away.
    pub fn unload(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.unload();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injector::{ToastInjector, ToastPorts};
    use crate::overlay::{MemoryOverlay, MemoryPage};
    use pagecue_config::ToastConfig;
    use pagecue_core::{MemoryBus, MemoryStore, PromptRegistry};
    use std::sync::Arc;
    use std::time::Duration;

    fn ports(overlay: &MemoryOverlay) -> ToastPorts {
        ToastPorts {
            overlay: Arc::new(overlay.clone()),
            page: Arc::new(MemoryPage::new("https://news.ycombinator.com/item?id=1")),
            bus: Arc::new(MemoryBus::default()),
            store: Arc::new(MemoryStore::new()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_load_reuses_running_script() {
        let overlay = MemoryOverlay::new();
        let registry = Arc::new(PromptRegistry::builtin());
        let mut slot = ContentScriptSlot::new();
        let mut loads = 0;

        for _ in 0..3 {
            slot.get_or_load(|| {
                loads += 1;
                ToastInjector::spawn(ports(&overlay), registry.clone(), ToastConfig::default(), true)
            });
        }
        assert_eq!(loads, 1);
        assert!(slot.is_loaded());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(overlay.mounted_total(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_after_unload_starts_fresh() {
        let overlay = MemoryOverlay::new();
        let registry = Arc::new(PromptRegistry::builtin());
        let mut slot = ContentScriptSlot::new();
        slot.get_or_load(|| {
            ToastInjector::spawn(ports(&overlay), registry.clone(), ToastConfig::default(), true)
        });

        slot.unload();
        assert!(!slot.is_loaded());
        assert!(slot.current().is_none());

        slot.get_or_load(|| {
            ToastInjector::spawn(ports(&overlay), registry.clone(), ToastConfig::default(), true)
        });
        assert!(slot.is_loaded());
    }
}
