//! Prompt registry: URL lookup and reverse lookup by prompt text.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::builtin;
use crate::matcher::CompiledPattern;
use crate::model::{normalize_prompt, ExecutionMetadata, PromptDefinition, UrlPromptMapping};

/// At most this many prompts are surfaced for one page.
pub const MAX_SUGGESTIONS: usize = 2;

/// Errors raised while building a registry from external data.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("I/O error reading prompt table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid prompt table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result of a reverse lookup by prompt text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskMatch<'a> {
    pub task: &'a str,
    pub metadata: &'a ExecutionMetadata,
}

#[derive(Debug, Clone)]
struct CompiledMapping {
    pattern: CompiledPattern,
    prompts: Vec<PromptDefinition>,
}

/// On-disk layout of a prompt table.
#[derive(Debug, Deserialize)]
struct PromptTable {
    #[serde(default)]
    global: Vec<PromptDefinition>,
    #[serde(default)]
    mappings: Vec<UrlPromptMapping>,
}

/// Immutable table of prompts, built once per execution context.
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    global: Vec<PromptDefinition>,
    mappings: Vec<CompiledMapping>,
}

impl PromptRegistry {
    /// Build a registry from a global prompt set and ordered URL mappings.
    pub fn new(
        global: Vec<PromptDefinition>,
        mappings: Vec<UrlPromptMapping>,
    ) -> Result<Self, RegistryError> {
        let global = global.into_iter().map(with_normalized).collect();
        let mappings = mappings
            .into_iter()
            .map(|mapping| {
                let pattern = CompiledPattern::new(&mapping.pattern).map_err(|source| {
                    RegistryError::InvalidPattern {
                        pattern: mapping.pattern.clone(),
                        source,
                    }
                })?;
                Ok(CompiledMapping {
                    pattern,
                    prompts: mapping.prompts.into_iter().map(with_normalized).collect(),
                })
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;

        Ok(Self { global, mappings })
    }

    /// The table shipped with the extension.
    pub fn builtin() -> Self {
        let global = builtin::global_prompts();
        let mappings = builtin::url_mappings()
            .into_iter()
            .filter_map(|mapping| match CompiledPattern::new(&mapping.pattern) {
                Ok(pattern) => Some(CompiledMapping {
                    pattern,
                    prompts: mapping.prompts,
                }),
                Err(e) => {
                    error!(pattern = %mapping.pattern, error = %e, "Skipping built-in mapping");
                    None
                }
            })
            .collect();
        Self { global, mappings }
    }

    /// Parse a table of the form `{ "global": [...], "mappings": [...] }`.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let table: PromptTable = serde_json::from_str(json)?;
        Self::new(table.global, table.mappings)
    }

    /// Load a table from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            mappings = registry.mappings.len(),
            "Loaded prompt table"
        );
        Ok(registry)
    }

    /// Display strings of the prompts offered for `url`.
    ///
    /// Only the first matching mapping contributes, and only its first
    /// [`MAX_SUGGESTIONS`] prompts.
    pub fn suggestive_prompts(&self, url: Option<&str>) -> Vec<&str> {
        let Some(url) = url.filter(|u| !u.is_empty()) else {
            return Vec::new();
        };

        for mapping in &self.mappings {
            if mapping.pattern.matches(url) {
                debug!(url = %url, pattern = %mapping.pattern.as_str(), "URL matched prompt mapping");
                return mapping
                    .prompts
                    .iter()
                    .take(MAX_SUGGESTIONS)
                    .map(|p| p.display_prompt.as_str())
                    .collect();
            }
        }

        Vec::new()
    }

    /// Find the task and metadata for a prompt by its text.
    ///
    /// Global prompts are searched first, then every mapping in declaration
    /// order; the first match wins.
    pub fn predefined_task_metadata(&self, prompt_text: &str) -> Option<TaskMatch<'_>> {
        self.all_prompts()
            .find(|def| def.matches_text(prompt_text))
            .map(|def| TaskMatch {
                task: &def.task,
                metadata: &def.metadata,
            })
    }

    /// Every prompt definition, in lookup order.
    pub fn all_prompts(&self) -> impl Iterator<Item = &PromptDefinition> {
        self.global
            .iter()
            .chain(self.mappings.iter().flat_map(|m| m.prompts.iter()))
    }

    /// URL patterns, in match priority order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.mappings.iter().map(|m| m.pattern.as_str())
    }
}

fn with_normalized(mut def: PromptDefinition) -> PromptDefinition {
    if def.normalized_prompt.is_empty() {
        def.normalized_prompt = normalize_prompt(&def.display_prompt);
    }
    def
}
