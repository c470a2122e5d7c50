//! Side panel half of pagecue.
//!
//! The [`PanelInputBinder`] receives prompts forwarded from page buttons,
//! switches the panel into agent mode when needed and fills the input
//! control once it is mounted.

pub mod binder;
pub mod event;
pub mod flags;
pub mod view;

pub use binder::{PanelInputBinder, PanelPorts};
pub use event::{PanelEvent, PanelHandle};
pub use flags::{PanelFlags, PENDING_PROMPT, SWITCH_TO_AGENT_MODE};
pub use view::{MemoryPanel, PanelView};
