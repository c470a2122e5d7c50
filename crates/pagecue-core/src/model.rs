//! Prompt definitions and their execution metadata.

use serde::{Deserialize, Serialize};

/// A predefined plan forwarded verbatim to the agent execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredefinedPlan {
    /// Plan identifier.
    pub agent_id: String,
    pub name: String,
    pub goal: String,
    /// Natural-language steps, in execution order.
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Execution metadata attached to a prompt, keyed by `executionMode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "executionMode", rename_all = "camelCase")]
pub enum ExecutionMetadata {
    Predefined {
        #[serde(rename = "predefinedPlan")]
        predefined_plan: PredefinedPlan,
    },
    /// Any execution mode this build does not know about.
    #[serde(other)]
    Unrecognized,
}

impl ExecutionMetadata {
    /// The plan carried by the `predefined` variant.
    pub fn plan(&self) -> Option<&PredefinedPlan> {
        match self {
            ExecutionMetadata::Predefined { predefined_plan } => Some(predefined_plan),
            ExecutionMetadata::Unrecognized => None,
        }
    }
}

/// One suggested prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDefinition {
    /// Text shown to the user, emoji included.
    #[serde(rename = "prompt", alias = "displayPrompt")]
    pub display_prompt: String,
    /// Lowercased, trimmed display text used for matching.
    #[serde(default)]
    pub normalized_prompt: String,
    /// Task description the agent sees.
    pub task: String,
    pub metadata: ExecutionMetadata,
}

impl PromptDefinition {
    /// Build a prompt backed by a predefined plan.
    pub fn predefined(
        display_prompt: &str,
        task: &str,
        agent_id: &str,
        name: &str,
        goal: &str,
        steps: &[&str],
    ) -> Self {
        Self {
            display_prompt: display_prompt.to_string(),
            normalized_prompt: normalize_prompt(display_prompt),
            task: task.to_string(),
            metadata: ExecutionMetadata::Predefined {
                predefined_plan: PredefinedPlan {
                    agent_id: agent_id.to_string(),
                    name: name.to_string(),
                    goal: goal.to_string(),
                    steps: steps.iter().map(|s| s.to_string()).collect(),
                },
            },
        }
    }

    /// Whether `text` names this prompt, ignoring case and surrounding whitespace.
    pub fn matches_text(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.normalized_prompt == lowered.trim() || lowered == self.display_prompt.to_lowercase()
    }
}

/// Prompts offered on pages whose URL matches `pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPromptMapping {
    /// Glob pattern over `host + path`, e.g. `*leetcode.com/problems/*`.
    pub pattern: String,
    pub prompts: Vec<PromptDefinition>,
}

/// Lowercase and trim a display prompt.
pub fn normalize_prompt(prompt: &str) -> String {
    prompt.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_serializes_with_mode_tag() {
        let def = PromptDefinition::predefined("Do it ✅", "Do it", "doer", "Doer", "Do", &["one", "two"]);
        let value = serde_json::to_value(&def.metadata).unwrap();
        assert_eq!(value["executionMode"], "predefined");
        assert_eq!(value["predefinedPlan"]["agentId"], "doer");
        assert_eq!(value["predefinedPlan"]["steps"], json!(["one", "two"]));
    }

    #[test]
    fn test_unknown_execution_mode_is_tolerated() {
        let value = json!({"executionMode": "dynamic", "whatever": 1});
        let metadata: ExecutionMetadata = serde_json::from_value(value).unwrap();
        assert_eq!(metadata, ExecutionMetadata::Unrecognized);
        assert!(metadata.plan().is_none());
    }

    #[test]
    fn test_definition_accepts_display_prompt_alias() {
        let value = json!({
            "displayPrompt": "Hello 👋",
            "task": "Say hello",
            "metadata": {"executionMode": "unknown"}
        });
        let def: PromptDefinition = serde_json::from_value(value).unwrap();
        assert_eq!(def.display_prompt, "Hello 👋");
        assert!(def.normalized_prompt.is_empty());
    }

    #[test]
    fn test_matches_text_is_case_and_whitespace_insensitive() {
        let def = PromptDefinition::predefined("Summarize video 📝", "t", "a", "n", "g", &[]);
        assert!(def.matches_text("summarize VIDEO 📝"));
        assert!(def.matches_text("  Summarize video 📝  "));
        assert!(!def.matches_text("Summarize video"));
    }
}
