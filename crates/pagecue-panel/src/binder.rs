//! Routes forwarded prompts into the panel's input control.
//!
//! The binder holds at most one pending prompt. It is armed when a prompt
//! arrives while the panel is not in agent mode (the binder switches modes
//! first) or when the mount flags carry one. A pending prompt is applied
//! once, after the fill settle delay, while the panel is in agent mode.

use pagecue_config::PanelConfig;
use pagecue_core::{AppMode, KeyValueStore, PromptRegistry, RuntimeBus, RuntimeMessage, TaskMatch};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::event::{PanelEvent, PanelHandle};
use crate::flags::{PanelFlags, PENDING_PROMPT};
use crate::view::PanelView;

#[derive(Clone)]
pub struct PanelPorts {
    pub view: Arc<dyn PanelView>,
    pub bus: Arc<dyn RuntimeBus>,
    pub store: Arc<dyn KeyValueStore>,
}

pub struct PanelInputBinder {
    ports: PanelPorts,
    registry: Arc<PromptRegistry>,
    config: PanelConfig,
    pending: Option<String>,
    /// Bumped whenever the pending fill is re-armed or cancelled.
    fill_generation: u64,
    highlight_generation: u64,
    events: mpsc::UnboundedSender<PanelEvent>,
}

impl PanelInputBinder {
    pub fn new(
        ports: PanelPorts,
        registry: Arc<PromptRegistry>,
        config: PanelConfig,
    ) -> (Self, mpsc::UnboundedReceiver<PanelEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let binder = Self {
            ports,
            registry,
            config,
            pending: None,
            fill_generation: 0,
            highlight_generation: 0,
            events,
        };
        (binder, receiver)
    }

    pub fn handle(&self) -> PanelHandle {
        PanelHandle::new(self.events.clone())
    }

    pub fn pending_prompt(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Predefined task for the current input text, if it is a known prompt.
    pub fn task_for_input<'a>(&'a self, text: &str) -> Option<TaskMatch<'a>> {
        self.registry.predefined_task_metadata(text)
    }

    /// Panel opened: dismiss page buttons and pick up the persisted flags.
    pub async fn mount(&mut self) {
        if let Err(e) = self.ports.bus.send(RuntimeMessage::HidePromptToast.to_value()).await {
            debug!(error = %e, "Coordinator not listening for hide request");
        }

        match PanelFlags::take(self.ports.store.as_ref()).await {
            Ok(flags) => {
                if flags.switch_to_agent {
                    self.ports.view.set_app_mode(AppMode::Agent);
                }
                if let Some(prompt) = flags.pending_prompt {
                    debug!(prompt = %prompt, "Re-arming pending prompt");
                    self.pending = Some(prompt);
                }
            }
            Err(e) => warn!(error = %e, "Failed to read panel flags"),
        }

        self.arm_pending_fill(self.ports.view.app_mode());
    }

    pub async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<PanelEvent>) {
        while let Some(event) = receiver.recv().await {
            if !self.handle_event(event).await {
                break;
            }
        }
    }

    /// Apply one event. Returns `false` once the panel closes.
    pub async fn handle_event(&mut self, event: PanelEvent) -> bool {
        match event {
            PanelEvent::Runtime(message) => {
                if let Some(RuntimeMessage::FillPromptInput { prompt }) =
                    RuntimeMessage::from_value(&message)
                {
                    self.on_fill_prompt_input(prompt).await;
                }
            }
            PanelEvent::ModeChanged(mode) => {
                debug!(mode = %mode, "Panel mode changed");
                self.arm_pending_fill(mode);
            }
            PanelEvent::FillDue { generation } => {
                if generation == self.fill_generation {
                    if let Some(prompt) = self.pending.take() {
                        self.fill_and_highlight(&prompt).await;
                    }
                }
            }
            PanelEvent::HighlightDue { generation } => {
                if generation == self.highlight_generation {
                    self.ports.view.restart_highlight();
                    self.schedule(
                        PanelEvent::HighlightExpired { generation },
                        self.config.highlight_duration(),
                    );
                }
            }
            PanelEvent::HighlightExpired { generation } => {
                if generation == self.highlight_generation {
                    self.ports.view.clear_highlight();
                }
            }
            PanelEvent::Close => return false,
        }
        true
    }

    /// A page button forwarded `prompt`.
    pub async fn on_fill_prompt_input(&mut self, prompt: String) {
        if prompt.is_empty() {
            return;
        }

        if self.ports.view.app_mode() == AppMode::Agent {
            // A direct fill supersedes anything still pending.
            self.pending = None;
            self.fill_generation += 1;
            self.fill_and_highlight(&prompt).await;
        } else {
            info!(prompt = %prompt, "Switching to agent mode for prompt");
            self.ports.view.set_app_mode(AppMode::Agent);
            self.pending = Some(prompt);
            self.arm_pending_fill(AppMode::Agent);
        }
    }

    /// Put `prompt` in the input and pulse the submit control.
    pub async fn fill_and_highlight(&mut self, prompt: &str) {
        self.ports.view.set_input(prompt);

        self.highlight_generation += 1;
        self.schedule(
            PanelEvent::HighlightDue {
                generation: self.highlight_generation,
            },
            self.config.highlight_delay(),
        );

        if let Err(e) = self.ports.store.remove(PENDING_PROMPT).await {
            warn!(error = %e, "Failed to clear persisted pending prompt");
        }
    }

    /// Cancel any scheduled fill, then schedule one when `mode` is agent.
    fn arm_pending_fill(&mut self, mode: AppMode) {
        self.fill_generation += 1;
        if self.pending.is_none() || mode != AppMode::Agent {
            return;
        }
        self.schedule(
            PanelEvent::FillDue {
                generation: self.fill_generation,
            },
            self.config.fill_settle(),
        );
    }

    fn schedule(&self, event: PanelEvent, delay: Duration) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(event);
        });
    }
}
