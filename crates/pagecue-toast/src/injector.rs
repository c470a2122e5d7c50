//! The in-page prompt button controller.

use pagecue_config::ToastConfig;
use pagecue_core::{
    InboundToastRequest, KeyValueStore, PromptRegistry, RuntimeBus, RuntimeMessage, ToastAck,
    ToastCommand,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use crate::event::{ToastEvent, ToastHandle};
use crate::mode_gate::mode_allows_display;
use crate::overlay::{Overlay, OverlayAction, OverlayId, PageLocation};

/// Browser capabilities a content script talks to.
#[derive(Clone)]
pub struct ToastPorts {
    pub overlay: Arc<dyn Overlay>,
    pub page: Arc<dyn PageLocation>,
    pub bus: Arc<dyn RuntimeBus>,
    pub store: Arc<dyn KeyValueStore>,
}

pub struct ToastInjector {
    ports: ToastPorts,
    registry: Arc<PromptRegistry>,
    config: ToastConfig,
    /// Group currently on screen and not fading.
    visible: Option<OverlayId>,
    last_url: Option<String>,
    settle_scheduled: bool,
    poll: Option<JoinHandle<()>>,
    events: mpsc::UnboundedSender<ToastEvent>,
}

impl ToastInjector {
    pub fn new(
        ports: ToastPorts,
        registry: Arc<PromptRegistry>,
        config: ToastConfig,
    ) -> (Self, mpsc::UnboundedReceiver<ToastEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let injector = Self {
            ports,
            registry,
            config,
            visible: None,
            last_url: None,
            settle_scheduled: false,
            poll: None,
            events,
        };
        (injector, receiver)
    }

    /// Build an injector, start its lifecycle and run it on a new task.
    pub fn spawn(
        ports: ToastPorts,
        registry: Arc<PromptRegistry>,
        config: ToastConfig,
        document_ready: bool,
    ) -> ToastHandle {
        let (mut injector, receiver) = Self::new(ports, registry, config);
        let handle = injector.handle();
        injector.start(document_ready);
        tokio::spawn(injector.run(receiver));
        handle
    }

    pub fn handle(&self) -> ToastHandle {
        ToastHandle::new(self.events.clone())
    }

    pub fn is_showing(&self) -> bool {
        self.visible.is_some()
    }

    /// Arm the initial check and the single-page-app URL poll.
    ///
    /// When the document is still loading, the initial check waits for
    /// [`ToastEvent::DocumentReady`].
    pub fn start(&mut self, document_ready: bool) {
        self.last_url = self.ports.page.current_url();
        if document_ready {
            self.schedule_initial_check();
        }
        self.start_polling();
    }

    pub async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<ToastEvent>) {
        while let Some(event) = receiver.recv().await {
            if !self.handle_event(event).await {
                break;
            }
        }
        self.stop_polling();
    }

    /// Apply one event. Returns `false` once the page unloads.
    pub async fn handle_event(&mut self, event: ToastEvent) -> bool {
        match event {
            ToastEvent::Command { request, reply } => self.on_command(request, reply).await,
            ToastEvent::ButtonClicked { prompt } => self.on_button_clicked(prompt).await,
            ToastEvent::DocumentReady => {
                if !self.settle_scheduled {
                    self.schedule_initial_check();
                }
            }
            ToastEvent::SettleElapsed => self.check_and_show().await,
            ToastEvent::PollTick => self.on_poll_tick().await,
            ToastEvent::AutoDismiss { id } => {
                if self.visible == Some(id) {
                    debug!(group = id.0, "Auto-dismissing prompt buttons");
                    self.hide_buttons();
                }
            }
            ToastEvent::FadeOutElapsed { id } => self.ports.overlay.remove(id),
            ToastEvent::Unload => {
                self.stop_polling();
                return false;
            }
        }
        true
    }

    /// Replace whatever is on screen with one button per prompt.
    pub fn show_buttons<S: AsRef<str>>(&mut self, prompts: &[S]) {
        self.hide_buttons();
        if prompts.is_empty() {
            return;
        }

        let actions: Vec<OverlayAction> = prompts
            .iter()
            .map(|prompt| OverlayAction::for_prompt(prompt.as_ref()))
            .collect();
        let id = self.ports.overlay.mount(&actions);
        self.visible = Some(id);
        self.schedule(ToastEvent::AutoDismiss { id }, self.config.auto_dismiss());
        debug!(group = id.0, count = actions.len(), "Showing prompt buttons");
    }

    /// Fade out the visible group; it is removed once the transition ends.
    pub fn hide_buttons(&mut self) {
        if let Some(id) = self.visible.take() {
            self.ports.overlay.fade_out(id);
            self.schedule(ToastEvent::FadeOutElapsed { id }, self.config.fade_out());
        }
    }

    /// Show the prompts matching the current URL, if any. Never hides.
    pub async fn check_and_show(&mut self) {
        let url = self.ports.page.current_url();
        let prompts: Vec<String> = self
            .registry
            .suggestive_prompts(url.as_deref())
            .into_iter()
            .map(str::to_string)
            .collect();
        if prompts.is_empty() {
            return;
        }

        if self.config.gate_on_agent_mode
            && !mode_allows_display(self.ports.store.as_ref(), &self.config.settings_key).await
        {
            debug!("Stored app mode is not agent, suppressing prompt buttons");
            return;
        }

        info!(url = url.as_deref().unwrap_or_default(), count = prompts.len(), "Suggesting prompts");
        self.show_buttons(&prompts);
    }

    async fn on_command(&mut self, request: Value, reply: oneshot::Sender<ToastAck>) {
        match InboundToastRequest::classify(&request) {
            InboundToastRequest::Foreign => {}
            InboundToastRequest::Command(ToastCommand::HideButtons) => {
                self.hide_buttons();
                let _ = reply.send(ToastAck::ok());
            }
            InboundToastRequest::Command(ToastCommand::CheckAndShow) => {
                self.check_and_show().await;
                let _ = reply.send(ToastAck::ok());
            }
            InboundToastRequest::Unknown(action) => {
                warn!(action = %action, "Unknown toast action");
                let _ = reply.send(ToastAck::unknown_action());
            }
        }
    }

    async fn on_button_clicked(&mut self, prompt: String) {
        let message = RuntimeMessage::FillPromptInput { prompt }.to_value();
        if let Err(e) = self.ports.bus.send(message).await {
            debug!(error = %e, "Side panel not listening for prompt");
        }
        self.hide_buttons();
    }

    async fn on_poll_tick(&mut self) {
        let current = self.ports.page.current_url();
        if current != self.last_url {
            debug!(url = current.as_deref().unwrap_or_default(), "Page URL changed");
            self.last_url = current;
            self.check_and_show().await;
        }
    }

    fn schedule_initial_check(&mut self) {
        self.settle_scheduled = true;
        self.schedule(ToastEvent::SettleElapsed, self.config.initial_settle());
    }

    fn start_polling(&mut self) {
        self.stop_polling();
        let events = self.events.clone();
        let period = self.config.poll_interval();
        self.poll = Some(tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                if events.send(ToastEvent::PollTick).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop_polling(&mut self) {
        if let Some(poll) = self.poll.take() {
            poll.abort();
        }
    }

    fn schedule(&self, event: ToastEvent, delay: Duration) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(event);
        });
    }
}
