//! In-memory browser that runs all three contexts end to end.

use async_trait::async_trait;
use pagecue_config::{Config, ToastConfig};
use pagecue_coordinator::{CoordinatorHandle, InjectionCoordinator};
use pagecue_core::{
    AppMode, HostError, MemoryBus, MemoryStore, PromptRegistry, ScriptingApi, TabId, TabInfo,
    TabsApi,
};
use pagecue_panel::{MemoryPanel, PanelHandle, PanelInputBinder, PanelPorts, PanelView};
use pagecue_toast::{
    ContentScriptSlot, MemoryOverlay, MemoryPage, OverlayAction, ToastHandle, ToastInjector,
    ToastPorts,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::debug;

/// Extra time allowed for chained events to settle after a timer fires.
const SETTLE_MARGIN: Duration = Duration::from_millis(100);

struct SimTab {
    info: TabInfo,
    page: MemoryPage,
    overlay: MemoryOverlay,
    slot: ContentScriptSlot,
}

/// Browser with tabs, pages and a shared runtime bus, all in memory.
pub struct SimBrowser {
    tabs: Mutex<BTreeMap<TabId, SimTab>>,
    next_id: Mutex<TabId>,
    bus: MemoryBus,
    store: MemoryStore,
    registry: Arc<PromptRegistry>,
    toast_config: ToastConfig,
    blocked_scripts: bool,
}

impl SimBrowser {
    pub fn new(registry: Arc<PromptRegistry>, toast_config: ToastConfig) -> Self {
        Self {
            tabs: Mutex::new(BTreeMap::new()),
            next_id: Mutex::new(1),
            bus: MemoryBus::default(),
            store: MemoryStore::new(),
            registry,
            toast_config,
            blocked_scripts: false,
        }
    }

    /// Make every script injection fail, like a page with a strict policy.
    pub fn with_blocked_scripts(mut self) -> Self {
        self.blocked_scripts = true;
        self
    }

    pub fn bus(&self) -> &MemoryBus {
        &self.bus
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    fn tabs(&self) -> Result<MutexGuard<'_, BTreeMap<TabId, SimTab>>, HostError> {
        self.tabs
            .lock()
            .map_err(|e| HostError::Storage(e.to_string()))
    }

    /// Open a tab. An active tab deactivates all others.
    pub fn open_tab(&self, url: &str, active: bool) -> Result<TabId, HostError> {
        let id = {
            let mut next = self
                .next_id
                .lock()
                .map_err(|e| HostError::Storage(e.to_string()))?;
            let id = *next;
            *next += 1;
            id
        };

        let mut tabs = self.tabs()?;
        if active {
            for tab in tabs.values_mut() {
                tab.info.active = false;
            }
        }
        tabs.insert(
            id,
            SimTab {
                info: TabInfo {
                    id,
                    url: Some(url.to_string()),
                    active,
                },
                page: MemoryPage::new(url),
                overlay: MemoryOverlay::new(),
                slot: ContentScriptSlot::new(),
            },
        );
        Ok(id)
    }

    /// Full navigation: the old page and its script go away.
    pub fn navigate(&self, tab_id: TabId, url: &str) -> Result<(), HostError> {
        let mut tabs = self.tabs()?;
        let tab = tabs.get_mut(&tab_id).ok_or(HostError::TabNotFound(tab_id))?;
        tab.slot.unload();
        tab.info.url = Some(url.to_string());
        tab.page = MemoryPage::new(url);
        tab.overlay = MemoryOverlay::new();
        Ok(())
    }

    /// In-page route change that keeps the document.
    pub fn push_state(&self, tab_id: TabId, url: &str) -> Result<(), HostError> {
        let mut tabs = self.tabs()?;
        let tab = tabs.get_mut(&tab_id).ok_or(HostError::TabNotFound(tab_id))?;
        tab.info.url = Some(url.to_string());
        tab.page.set_url(url);
        Ok(())
    }

    pub fn close_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        let mut tab = self
            .tabs()?
            .remove(&tab_id)
            .ok_or(HostError::TabNotFound(tab_id))?;
        tab.slot.unload();
        Ok(())
    }

    /// Buttons currently shown in a tab.
    pub fn visible_buttons(&self, tab_id: TabId) -> Vec<OverlayAction> {
        self.tabs()
            .ok()
            .and_then(|tabs| tabs.get(&tab_id).and_then(|t| t.overlay.visible_actions()))
            .unwrap_or_default()
    }

    pub fn overlay(&self, tab_id: TabId) -> Option<MemoryOverlay> {
        self.tabs().ok()?.get(&tab_id).map(|t| t.overlay.clone())
    }

    pub fn has_script(&self, tab_id: TabId) -> bool {
        self.tabs()
            .map(|tabs| tabs.get(&tab_id).is_some_and(|t| t.slot.is_loaded()))
            .unwrap_or(false)
    }

    fn script(&self, tab_id: TabId) -> Option<ToastHandle> {
        self.tabs().ok()?.get(&tab_id)?.slot.current().cloned()
    }

    /// Click the first visible button of a tab, returning its prompt.
    pub fn click_first_button(&self, tab_id: TabId) -> Result<Option<String>, HostError> {
        let Some(action) = self.visible_buttons(tab_id).into_iter().next() else {
            return Ok(None);
        };
        let script = self.script(tab_id).ok_or(HostError::TabNotFound(tab_id))?;
        script.click(action.prompt.clone())?;
        Ok(Some(action.prompt))
    }

    /// Unload every page script.
    pub fn shutdown(&self) {
        if let Ok(mut tabs) = self.tabs.lock() {
            for tab in tabs.values_mut() {
                tab.slot.unload();
            }
        }
    }
}

#[async_trait]
impl TabsApi for SimBrowser {
    async fn get(&self, tab_id: TabId) -> Result<TabInfo, HostError> {
        self.tabs()?
            .get(&tab_id)
            .map(|t| t.info.clone())
            .ok_or(HostError::TabNotFound(tab_id))
    }

    async fn query_all(&self) -> Result<Vec<TabInfo>, HostError> {
        Ok(self.tabs()?.values().map(|t| t.info.clone()).collect())
    }

    async fn query_active(&self) -> Result<Option<TabInfo>, HostError> {
        Ok(self
            .tabs()?
            .values()
            .find(|t| t.info.active)
            .map(|t| t.info.clone()))
    }

    async fn send_message(&self, tab_id: TabId, message: Value) -> Result<Value, HostError> {
        let script = self
            .script(tab_id)
            .ok_or_else(|| HostError::NoReceiver(format!("tab {}", tab_id)))?;
        match script.request(message).await? {
            Some(ack) => serde_json::to_value(ack).map_err(|e| HostError::NoReceiver(e.to_string())),
            None => Ok(Value::Null),
        }
    }
}

#[async_trait]
impl ScriptingApi for SimBrowser {
    async fn execute_script(&self, tab_id: TabId, file: &str) -> Result<(), HostError> {
        if self.blocked_scripts {
            return Err(HostError::ScriptInjection(format!("{} blocked", file)));
        }

        let mut tabs = self.tabs()?;
        let tab = tabs.get_mut(&tab_id).ok_or(HostError::TabNotFound(tab_id))?;
        let ports = ToastPorts {
            overlay: Arc::new(tab.overlay.clone()),
            page: Arc::new(tab.page.clone()),
            bus: Arc::new(self.bus.clone()),
            store: Arc::new(self.store.clone()),
        };
        let registry = self.registry.clone();
        let config = self.toast_config.clone();
        tab.slot
            .get_or_load(|| ToastInjector::spawn(ports, registry, config, true));
        debug!(tab_id, file, "Content script loaded");
        Ok(())
    }
}

/// Forward runtime bus traffic to a context until the bus closes.
fn forward_bus<F>(mut receiver: broadcast::Receiver<Value>, deliver: F)
where
    F: Fn(Value) -> Result<(), HostError> + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(message) => {
                    if deliver(message).is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Runtime bus receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Buttons shown in one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabReport {
    pub id: TabId,
    pub url: String,
    pub script_loaded: bool,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub tabs: Vec<TabReport>,
    /// Prompt clicked in the active tab, if any.
    pub clicked: Option<String>,
    pub panel_mode: AppMode,
    pub panel_input: Option<String>,
    /// Predefined task resolved from the panel input.
    pub task: Option<String>,
}

/// The three contexts wired over one simulated browser.
pub struct Simulation {
    pub browser: Arc<SimBrowser>,
    pub coordinator: CoordinatorHandle,
    pub panel: MemoryPanel,
    panel_handle: PanelHandle,
    registry: Arc<PromptRegistry>,
    config: Config,
}

impl Simulation {
    /// Start the coordinator and an open side panel in chat mode.
    pub async fn start(browser: SimBrowser, registry: Arc<PromptRegistry>, config: Config) -> Self {
        let browser = Arc::new(browser);

        let (coordinator, events) =
            InjectionCoordinator::new(browser.clone(), config.coordinator.clone());
        let coordinator_handle = coordinator.handle();
        tokio::spawn(coordinator.run(events));
        let relay = coordinator_handle.clone();
        forward_bus(browser.bus().subscribe(), move |m| relay.runtime_message(m));

        let panel = MemoryPanel::new(AppMode::Chat);
        let ports = PanelPorts {
            view: Arc::new(panel.clone()),
            bus: Arc::new(browser.bus().clone()),
            store: Arc::new(browser.store().clone()),
        };
        let (mut binder, panel_events) =
            PanelInputBinder::new(ports, registry.clone(), config.panel.clone());
        let panel_handle = binder.handle();
        let relay = panel_handle.clone();
        forward_bus(browser.bus().subscribe(), move |m| relay.runtime_message(m));
        binder.mount().await;
        tokio::spawn(binder.run(panel_events));

        Self {
            browser,
            coordinator: coordinator_handle,
            panel,
            panel_handle,
            registry,
            config,
        }
    }

    /// Time for a scheduled injection to show its buttons.
    pub fn injection_wait(&self) -> Duration {
        self.config.coordinator.navigation_delay() + SETTLE_MARGIN
    }

    /// Time for a forwarded prompt to land in the panel input.
    pub fn fill_wait(&self) -> Duration {
        self.config.panel.fill_settle() + self.config.panel.highlight_delay() + SETTLE_MARGIN
    }

    pub fn navigate(&self, tab_id: TabId, url: &str) -> Result<(), HostError> {
        self.browser.navigate(tab_id, url)?;
        self.coordinator.navigation_committed(tab_id, 0)
    }

    pub fn close_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        self.browser.close_tab(tab_id)?;
        self.coordinator.tab_closed(tab_id)
    }

    pub fn task_for_input(&self) -> Option<String> {
        let input = self.panel.input()?;
        self.registry
            .predefined_task_metadata(&input)
            .map(|m| m.task.to_string())
    }

    pub async fn report(&self, clicked: Option<String>) -> Result<SimulationReport, HostError> {
        let tabs = self
            .browser
            .query_all()
            .await?
            .into_iter()
            .map(|tab| TabReport {
                id: tab.id,
                url: tab.url.unwrap_or_default(),
                script_loaded: self.browser.has_script(tab.id),
                labels: self
                    .browser
                    .visible_buttons(tab.id)
                    .into_iter()
                    .map(|a| a.label)
                    .collect(),
            })
            .collect();

        Ok(SimulationReport {
            tabs,
            clicked,
            panel_mode: self.panel.app_mode(),
            panel_input: self.panel.input(),
            task: self.task_for_input(),
        })
    }

    pub fn shutdown(&self) {
        let _ = self.coordinator.shutdown();
        let _ = self.panel_handle.close();
        self.browser.shutdown();
    }
}

/// Open `urls` (the first one active), let the prompts appear, optionally
/// click the first button of the active tab, and report the outcome.
pub async fn simulate(
    urls: &[String],
    click: bool,
    registry: Arc<PromptRegistry>,
    config: Config,
) -> Result<SimulationReport, HostError> {
    let browser = SimBrowser::new(registry.clone(), config.toast.clone());
    let mut active = None;
    for (i, url) in urls.iter().enumerate() {
        let id = browser.open_tab(url, i == 0)?;
        active.get_or_insert(id);
    }

    let sim = Simulation::start(browser, registry, config).await;
    sim.coordinator.startup()?;
    tokio::time::sleep(sim.injection_wait()).await;

    let mut clicked = None;
    if click {
        if let Some(tab_id) = active {
            clicked = sim.browser.click_first_button(tab_id)?;
            if clicked.is_some() {
                tokio::time::sleep(sim.fill_wait()).await;
            }
        }
    }

    let report = sim.report(clicked).await;
    sim.shutdown();
    report
}
