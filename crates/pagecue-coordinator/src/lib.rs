//! Background-side injection coordinator.
//!
//! Tracks which tabs carry the toast content script, re-injects after
//! navigation, and relays hide requests to the injected scripts.

pub mod coordinator;
pub mod event;

pub use coordinator::InjectionCoordinator;
pub use event::{CoordinatorEvent, CoordinatorHandle};
