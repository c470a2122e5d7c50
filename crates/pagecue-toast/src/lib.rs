//! Content-script side of pagecue.
//!
//! A [`ToastInjector`] lives inside one page. It asks the prompt registry for
//! suggestions matching the page URL, renders them as a transient overlay of
//! buttons, and forwards a clicked prompt to the side panel over the runtime
//! bus. Rendering goes through the [`Overlay`] trait so the timing logic can
//! run without a DOM.

pub mod event;
pub mod injector;
pub mod mode_gate;
pub mod overlay;
pub mod slot;

pub use event::{ToastEvent, ToastHandle};
pub use injector::{ToastInjector, ToastPorts};
pub use mode_gate::{mode_allows_display, stored_app_mode, StoredMode};
pub use overlay::{MemoryOverlay, MemoryPage, Overlay, OverlayAction, OverlayId, PageLocation};
pub use slot::ContentScriptSlot;
