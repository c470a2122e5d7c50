//! Shared core for the pagecue prompt suggestion feature.
//!
//! This crate holds everything the three extension contexts (background
//! coordinator, content script, side panel) agree on:
//!
//! - `PromptRegistry`: the prompt table, URL lookup and reverse text lookup
//! - `match_pattern`: glob-style URL pattern matching
//! - `display_text_from_prompt`: short "Word+emoji" button labels
//! - `ToastCommand` / `RuntimeMessage`: the closed message protocol
//! - `host`: capability traits standing in for the browser APIs
//!
//! # Example
//!
//! ```
//! use pagecue_core::{display_text_from_prompt, PromptRegistry};
//!
//! let registry = PromptRegistry::builtin();
//! let prompts = registry.suggestive_prompts(Some("https://leetcode.com/problems/two-sum"));
//! assert_eq!(prompts.len(), 2);
//! assert_eq!(display_text_from_prompt(Some(prompts[0])), "Fix🔧");
//! ```

pub mod builtin;
pub mod display;
pub mod host;
pub mod matcher;
pub mod memory;
pub mod message;
pub mod model;
pub mod registry;

pub use display::{accessible_description, badge_title, display_text_from_prompt, DEFAULT_DISPLAY};
pub use host::{
    is_privileged_url, FrameId, HostError, KeyValueStore, RuntimeBus, ScriptingApi, TabId,
    TabInfo, TabsApi,
};
pub use matcher::{match_pattern, CompiledPattern};
pub use memory::{MemoryBus, MemoryStore};
pub use message::{
    AppMode, InboundToastRequest, RuntimeMessage, ToastAck, ToastCommand, TOAST_SOURCE,
};
pub use model::{normalize_prompt, ExecutionMetadata, PredefinedPlan, PromptDefinition, UrlPromptMapping};
pub use registry::{PromptRegistry, RegistryError, TaskMatch};
