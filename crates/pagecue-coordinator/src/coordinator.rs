//! Per-tab injection state machine.
//!
//! A tab is either injected (present in the set) or not. Injection happens
//! on startup and after every committed top-level navigation, each after a
//! settle delay. A navigation evicts the tab at once so the delayed
//! re-injection is never short-circuited by stale state.

use pagecue_config::CoordinatorConfig;
use pagecue_core::{
    is_privileged_url, FrameId, RuntimeMessage, ScriptingApi, TabId, TabsApi, ToastCommand,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::event::{CoordinatorEvent, CoordinatorHandle};

/// Frame id of a tab's top-level document.
const TOP_LEVEL_FRAME: FrameId = 0;

pub struct InjectionCoordinator<H> {
    host: Arc<H>,
    config: CoordinatorConfig,
    injected: HashSet<TabId>,
    events: mpsc::UnboundedSender<CoordinatorEvent>,
}

impl<H> InjectionCoordinator<H>
where
    H: TabsApi + ScriptingApi + 'static,
{
    /// Create the coordinator and the receiving end of its event channel.
    pub fn new(
        host: Arc<H>,
        config: CoordinatorConfig,
    ) -> (Self, mpsc::UnboundedReceiver<CoordinatorEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let coordinator = Self {
            host,
            config,
            injected: HashSet::new(),
            events,
        };
        (coordinator, receiver)
    }

    pub fn handle(&self) -> CoordinatorHandle {
        CoordinatorHandle::new(self.events.clone())
    }

    pub fn is_injected(&self, tab_id: TabId) -> bool {
        self.injected.contains(&tab_id)
    }

    pub fn injected_count(&self) -> usize {
        self.injected.len()
    }

    /// Process events until `Shutdown`, then drop all per-tab state.
    pub async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<CoordinatorEvent>) {
        info!("Injection coordinator started");
        while let Some(event) = receiver.recv().await {
            if !self.handle_event(event).await {
                break;
            }
        }
        self.injected.clear();
        info!("Injection coordinator stopped");
    }

    /// Apply one event. Returns `false` once the coordinator should stop.
    pub async fn handle_event(&mut self, event: CoordinatorEvent) -> bool {
        match event {
            CoordinatorEvent::Startup => self.inject_on_existing_tabs().await,
            CoordinatorEvent::NavigationCommitted { tab_id, frame_id } => {
                self.on_navigation_committed(tab_id, frame_id)
            }
            CoordinatorEvent::TabClosed(tab_id) => self.on_tab_closed(tab_id),
            CoordinatorEvent::Runtime(message) => match RuntimeMessage::from_value(&message) {
                Some(RuntimeMessage::HidePromptToast) => self.hide_on_active_tab().await,
                Some(RuntimeMessage::FillPromptInput { .. }) | None => {}
            },
            CoordinatorEvent::InjectDue(tab_id) => self.inject(tab_id).await,
            CoordinatorEvent::Shutdown => return false,
        }
        true
    }

    /// Inject the toast script into `tab_id` unless it already carries one.
    pub async fn inject(&mut self, tab_id: TabId) {
        if self.injected.contains(&tab_id) {
            return;
        }

        let tab = match self.host.get(tab_id).await {
            Ok(tab) => tab,
            Err(e) => {
                debug!(tab_id, error = %e, "Tab gone before injection");
                self.injected.remove(&tab_id);
                return;
            }
        };

        match tab.url.as_deref() {
            Some(url) if !is_privileged_url(url) => {}
            _ => {
                debug!(tab_id, url = ?tab.url, "Skipping injection for tab without an eligible URL");
                return;
            }
        }

        if let Err(e) = self.host.execute_script(tab_id, &self.config.script_file).await {
            warn!(tab_id, error = %e, "Failed to inject prompt toast");
            return;
        }
        self.injected.insert(tab_id);

        if let Err(e) = self
            .host
            .send_message(tab_id, ToastCommand::CheckAndShow.to_value())
            .await
        {
            warn!(tab_id, error = %e, "Failed to send check message");
        }

        info!(tab_id, "Injected prompt toast");
    }

    /// Tell the script in `tab_id` to dismiss its buttons.
    pub async fn hide(&self, tab_id: TabId) {
        if !self.injected.contains(&tab_id) {
            return;
        }
        if let Err(e) = self
            .host
            .send_message(tab_id, ToastCommand::HideButtons.to_value())
            .await
        {
            warn!(tab_id, error = %e, "Failed to send hide message");
        }
    }

    pub async fn hide_on_active_tab(&self) {
        match self.host.query_active().await {
            Ok(Some(tab)) => self.hide(tab.id).await,
            Ok(None) => debug!("No active tab to hide buttons on"),
            Err(e) => warn!(error = %e, "Failed to query active tab"),
        }
    }

    /// Evict a tab on top-level navigation and schedule its re-injection.
    pub fn on_navigation_committed(&mut self, tab_id: TabId, frame_id: FrameId) {
        if frame_id != TOP_LEVEL_FRAME {
            return;
        }
        self.injected.remove(&tab_id);
        self.schedule_injection(tab_id);
    }

    pub fn on_tab_closed(&mut self, tab_id: TabId) {
        if self.injected.remove(&tab_id) {
            info!(tab_id, "Cleaned up prompt toast for closed tab");
        }
    }

    async fn inject_on_existing_tabs(&mut self) {
        let tabs = match self.host.query_all().await {
            Ok(tabs) => tabs,
            Err(e) => {
                warn!(error = %e, "Failed to query existing tabs");
                return;
            }
        };

        for tab in tabs {
            if matches!(tab.url.as_deref(), Some(url) if !is_privileged_url(url)) {
                self.schedule_injection(tab.id);
            }
        }
    }

    fn schedule_injection(&self, tab_id: TabId) {
        let events = self.events.clone();
        let delay = self.config.navigation_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(CoordinatorEvent::InjectDue(tab_id));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pagecue_core::{HostError, TabInfo};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeBrowser {
        tabs: Mutex<HashMap<TabId, TabInfo>>,
        scripts: Mutex<Vec<TabId>>,
        sent: Mutex<Vec<(TabId, Value)>>,
        fail_script: bool,
        fail_send: bool,
    }

    impl FakeBrowser {
        fn with_tabs(tabs: &[(TabId, Option<&str>, bool)]) -> Self {
            let browser = Self::default();
            for (id, url, active) in tabs {
                browser.tabs.lock().unwrap().insert(
                    *id,
                    TabInfo { id: *id, url: url.map(str::to_string), active: *active },
                );
            }
            browser
        }

        fn script_count(&self) -> usize {
            self.scripts.lock().unwrap().len()
        }

        fn sent(&self) -> Vec<(TabId, Value)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TabsApi for FakeBrowser {
        async fn get(&self, tab_id: TabId) -> Result<TabInfo, HostError> {
            self.tabs.lock().unwrap().get(&tab_id).cloned().ok_or(HostError::TabNotFound(tab_id))
        }

        async fn query_all(&self) -> Result<Vec<TabInfo>, HostError> {
            let mut tabs: Vec<_> = self.tabs.lock().unwrap().values().cloned().collect();
            tabs.sort_by_key(|t| t.id);
            Ok(tabs)
        }

        async fn query_active(&self) -> Result<Option<TabInfo>, HostError> {
            Ok(self.tabs.lock().unwrap().values().find(|t| t.active).cloned())
        }

        async fn send_message(&self, tab_id: TabId, message: Value) -> Result<Value, HostError> {
            self.sent.lock().unwrap().push((tab_id, message.clone()));
            if self.fail_send {
                return Err(HostError::NoReceiver(message.to_string()));
            }
            Ok(json!({"success": true}))
        }
    }

    #[async_trait]
    impl ScriptingApi for FakeBrowser {
        async fn execute_script(&self, tab_id: TabId, _file: &str) -> Result<(), HostError> {
            if self.fail_script {
                return Err(HostError::ScriptInjection("blocked".into()));
            }
            self.scripts.lock().unwrap().push(tab_id);
            Ok(())
        }
    }

    fn coordinator(
        browser: FakeBrowser,
    ) -> (InjectionCoordinator<FakeBrowser>, mpsc::UnboundedReceiver<CoordinatorEvent>, Arc<FakeBrowser>) {
        let browser = Arc::new(browser);
        let (coordinator, rx) = InjectionCoordinator::new(browser.clone(), CoordinatorConfig::default());
        (coordinator, rx, browser)
    }

    #[tokio::test]
    async fn test_inject_marks_tab_and_sends_check() {
        let (mut c, _rx, browser) = coordinator(FakeBrowser::with_tabs(&[(1, Some("https://leetcode.com/problems/a"), true)]));
        c.inject(1).await;
        assert!(c.is_injected(1));
        assert_eq!(browser.script_count(), 1);
        assert_eq!(browser.sent(), vec![(1, ToastCommand::CheckAndShow.to_value())]);
    }

    #[tokio::test]
    async fn test_inject_is_idempotent() {
        let (mut c, _rx, browser) = coordinator(FakeBrowser::with_tabs(&[(1, Some("https://example.com"), true)]));
        c.inject(1).await;
        c.inject(1).await;
        assert_eq!(browser.script_count(), 1);
        assert_eq!(browser.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_skips_missing_and_privileged_tabs() {
        let (mut c, _rx, browser) = coordinator(FakeBrowser::with_tabs(&[
            (1, Some("chrome://settings"), false),
            (2, Some("moz-extension://abc/page.html"), false),
            (3, None, false),
        ]));
        for tab in [1, 2, 3, 99] {
            c.inject(tab).await;
        }
        assert_eq!(c.injected_count(), 0);
        assert_eq!(browser.script_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_injection_leaves_tab_uninjected() {
        let mut browser = FakeBrowser::with_tabs(&[(1, Some("https://example.com"), true)]);
        browser.fail_script = true;
        let (mut c, _rx, browser) = coordinator(browser);
        c.inject(1).await;
        assert!(!c.is_injected(1));
        assert!(browser.sent().is_empty());
    }

    #[tokio::test]
    async fn test_failed_check_message_keeps_injected_state() {
        let mut browser = FakeBrowser::with_tabs(&[(1, Some("https://example.com"), true)]);
        browser.fail_send = true;
        let (mut c, _rx, _browser) = coordinator(browser);
        c.inject(1).await;
        assert!(c.is_injected(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_evicts_before_reinjection() {
        let (mut c, mut rx, browser) = coordinator(FakeBrowser::with_tabs(&[(1, Some("https://example.com"), true)]));
        c.inject(1).await;
        assert!(c.is_injected(1));

        c.handle_event(CoordinatorEvent::NavigationCommitted { tab_id: 1, frame_id: 0 }).await;
        assert!(!c.is_injected(1));
        assert_eq!(browser.script_count(), 1);

        let started = tokio::time::Instant::now();
        let event = rx.recv().await.unwrap();
        assert_eq!(event, CoordinatorEvent::InjectDue(1));
        assert!(started.elapsed() >= Duration::from_millis(500));

        c.handle_event(event).await;
        assert!(c.is_injected(1));
        assert_eq!(browser.script_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subframe_navigation_is_ignored() {
        let (mut c, mut rx, _browser) = coordinator(FakeBrowser::with_tabs(&[(1, Some("https://example.com"), true)]));
        c.inject(1).await;
        c.handle_event(CoordinatorEvent::NavigationCommitted { tab_id: 1, frame_id: 7 }).await;
        assert!(c.is_injected(1));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_schedules_eligible_tabs() {
        let (mut c, mut rx, browser) = coordinator(FakeBrowser::with_tabs(&[
            (1, Some("https://example.com"), true),
            (2, Some("chrome://newtab"), false),
            (3, Some("https://www.youtube.com/watch?v=x"), false),
        ]));
        c.handle_event(CoordinatorEvent::Startup).await;
        assert_eq!(browser.script_count(), 0);

        let mut due = vec![];
        for _ in 0..2 {
            match rx.recv().await.unwrap() {
                CoordinatorEvent::InjectDue(tab) => due.push(tab),
                other => panic!("unexpected event {:?}", other),
            }
        }
        due.sort();
        assert_eq!(due, vec![1, 3]);
        for tab in due {
            c.handle_event(CoordinatorEvent::InjectDue(tab)).await;
        }
        assert_eq!(c.injected_count(), 2);
        assert!(!c.is_injected(2));
    }

    #[tokio::test]
    async fn test_tab_closed_drops_entry() {
        let (mut c, _rx, _browser) = coordinator(FakeBrowser::with_tabs(&[(1, Some("https://example.com"), true)]));
        c.inject(1).await;
        c.handle_event(CoordinatorEvent::TabClosed(1)).await;
        assert!(!c.is_injected(1));
        c.on_tab_closed(42);
    }

    #[tokio::test]
    async fn test_hide_only_reaches_injected_tabs() {
        let (mut c, _rx, browser) = coordinator(FakeBrowser::with_tabs(&[
            (1, Some("https://example.com"), true),
            (2, Some("https://example.org"), false),
        ]));
        c.hide(1).await;
        assert!(browser.sent().is_empty());

        c.inject(1).await;
        c.hide(1).await;
        c.hide(2).await;
        assert_eq!(browser.sent().last().unwrap(), &(1, ToastCommand::HideButtons.to_value()));
        assert_eq!(browser.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_hide_prompt_toast_message_targets_active_tab() {
        let (mut c, _rx, browser) = coordinator(FakeBrowser::with_tabs(&[
            (1, Some("https://example.com"), false),
            (2, Some("https://example.org"), true),
        ]));
        c.inject(1).await;
        c.inject(2).await;
        c.handle_event(CoordinatorEvent::Runtime(RuntimeMessage::HidePromptToast.to_value())).await;
        assert_eq!(browser.sent().last().unwrap(), &(2, ToastCommand::HideButtons.to_value()));

        let before = browser.sent().len();
        c.handle_event(CoordinatorEvent::Runtime(json!({"type": "FILL_PROMPT_INPUT", "prompt": "x"}))).await;
        c.handle_event(CoordinatorEvent::Runtime(json!({"unrelated": true}))).await;
        assert_eq!(browser.sent().len(), before);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (c, rx, _browser) = coordinator(FakeBrowser::default());
        let handle = c.handle();
        let task = tokio::spawn(c.run(rx));
        handle.tab_closed(5).unwrap();
        handle.shutdown().unwrap();
        task.await.unwrap();
    }
}
