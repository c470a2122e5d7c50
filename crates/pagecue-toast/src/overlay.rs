//! Rendering surface for the prompt buttons.

use pagecue_core::{accessible_description, display_text_from_prompt};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Identifies one mounted button group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub u64);

/// One button of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayAction {
    /// Short "Word+emoji" label.
    pub label: String,
    /// Accessible description carrying the full prompt.
    pub description: String,
    /// Prompt sent when the button is clicked.
    pub prompt: String,
}

impl OverlayAction {
    pub fn for_prompt(prompt: &str) -> Self {
        Self {
            label: display_text_from_prompt(Some(prompt)),
            description: accessible_description(prompt),
            prompt: prompt.to_string(),
        }
    }
}

/// A transient floating container of labeled actions.
///
/// The page binding renders each group as one fixed-position container on
/// the right edge of the viewport, buttons stacked vertically.
pub trait Overlay: Send + Sync {
    /// Render a group and return its id.
    fn mount(&self, actions: &[OverlayAction]) -> OverlayId;

    /// Start the fade-out transition of a group.
    fn fade_out(&self, id: OverlayId);

    /// Detach a group from the page. Unknown ids are ignored.
    fn remove(&self, id: OverlayId);
}

/// Read access to the page's visible URL.
pub trait PageLocation: Send + Sync {
    fn current_url(&self) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedGroup {
    pub actions: Vec<OverlayAction>,
    pub fading: bool,
}

#[derive(Debug, Default)]
struct OverlayState {
    next_id: u64,
    groups: BTreeMap<OverlayId, MountedGroup>,
    mounted_total: usize,
}

/// Overlay that keeps mounted groups in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryOverlay {
    state: Arc<Mutex<OverlayState>>,
}

impl MemoryOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of containers currently attached, fading ones included.
    pub fn container_count(&self) -> usize {
        self.state.lock().map(|s| s.groups.len()).unwrap_or(0)
    }

    /// Number of groups ever mounted.
    pub fn mounted_total(&self) -> usize {
        self.state.lock().map(|s| s.mounted_total).unwrap_or(0)
    }

    /// Actions of the newest group that is not fading out.
    pub fn visible_actions(&self) -> Option<Vec<OverlayAction>> {
        let state = self.state.lock().ok()?;
        state
            .groups
            .values()
            .rev()
            .find(|g| !g.fading)
            .map(|g| g.actions.clone())
    }

    pub fn group(&self, id: OverlayId) -> Option<MountedGroup> {
        self.state.lock().ok()?.groups.get(&id).cloned()
    }
}

impl Overlay for MemoryOverlay {
    fn mount(&self, actions: &[OverlayAction]) -> OverlayId {
        let Ok(mut state) = self.state.lock() else {
            return OverlayId(0);
        };
        state.next_id += 1;
        state.mounted_total += 1;
        let id = OverlayId(state.next_id);
        state.groups.insert(
            id,
            MountedGroup {
                actions: actions.to_vec(),
                fading: false,
            },
        );
        id
    }

    fn fade_out(&self, id: OverlayId) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(group) = state.groups.get_mut(&id) {
                group.fading = true;
            }
        }
    }

    fn remove(&self, id: OverlayId) {
        if let Ok(mut state) = self.state.lock() {
            state.groups.remove(&id);
        }
    }
}

/// Page whose URL can be changed in place, like single-page-app routing.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    url: Arc<Mutex<Option<String>>>,
}

impl MemoryPage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Arc::new(Mutex::new(Some(url.into()))),
        }
    }

    pub fn set_url(&self, url: impl Into<String>) {
        if let Ok(mut current) = self.url.lock() {
            *current = Some(url.into());
        }
    }
}

impl PageLocation for MemoryPage {
    fn current_url(&self) -> Option<String> {
        self.url.lock().ok()?.clone()
    }
}
