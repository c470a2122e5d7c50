//! Short "Word+emoji" labels for prompt buttons and badges.

/// Label used when nothing better can be derived.
pub const DEFAULT_DISPLAY: &str = "Agent";

/// Short label for a full prompt.
///
/// Known prompts map to a fixed label; anything else falls back to its
/// leading ASCII word, capitalized. Never fails.
pub fn display_text_from_prompt(prompt: Option<&str>) -> String {
    let Some(prompt) = prompt.filter(|p| !p.is_empty()) else {
        return DEFAULT_DISPLAY.to_string();
    };

    let trimmed = prompt.trim();
    if let Some(label) = known_label(trimmed) {
        return label.to_string();
    }

    let word_len = trimmed
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    if word_len == 0 {
        return DEFAULT_DISPLAY.to_string();
    }

    let word = &trimmed[..word_len];
    let mut label = String::with_capacity(word_len);
    label.push_str(&word[..1].to_ascii_uppercase());
    label.push_str(&word[1..].to_ascii_lowercase());
    label
}

/// Accessible description attached to a prompt button.
pub fn accessible_description(prompt: &str) -> String {
    format!("Use prompt: {}", prompt)
}

/// Tooltip for the side panel's prompt badge.
pub fn badge_title(label: &str) -> String {
    format!("Suggested prompt: {}", label)
}

fn known_label(prompt: &str) -> Option<&'static str> {
    let label = match prompt {
        "Fix my code to pass all test cases 🔧" => "Fix🔧",
        "Write an optimal solution with step-by-step explanation 📝" => "Write📝",
        "Read about our vision and upvote ❤️" => "Read❤️",
        "Support BrowserOS on Github ⭐" => "Support⭐",
        "Open amazon.com and order Sensodyne toothpaste 🪥" => "Open🪥",
        "Summarize PR changes 📝" => "Summarize📝",
        "Review PR changes 🔍" => "Review🔍",
        "Summarize video 📝" => "Summarize📝",
        "Extract key takeaways 🔑" => "Takeaways🔑",
        "Find timestamps ⏱️" => "Timestamps⏱️",
        "Summarize reviews ⭐" => "Reviews⭐",
        "Compare with similar items ⚖️" => "Compare⚖️",
        "Is this a good deal? 💰" => "Deal?💰",
        "Summarize thread 🧵" => "Summarize🧵",
        "Draft reply ✍️" => "Reply✍️",
        "Extract action items ✅" => "Actions✅",
        "Summarize profile 👤" => "Profile👤",
        "Draft connection message 🤝" => "Connect🤝",
        "Fact check 🔍" => "FactCheck🔍",
        "TL;DR ⚡" => "TL;DR⚡",
        "Explain like I'm 5 👶" => "ELI5👶",
        "Summarize solution ✅" => "Solution✅",
        "Summarize discussion 💬" => "Discuss💬",
        _ => return None,
    };
    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PromptRegistry;

    #[test]
    fn test_default_for_missing_input() {
        assert_eq!(display_text_from_prompt(None), DEFAULT_DISPLAY);
        assert_eq!(display_text_from_prompt(Some("")), DEFAULT_DISPLAY);
        assert_eq!(display_text_from_prompt(Some("   ")), DEFAULT_DISPLAY);
    }

    #[test]
    fn test_known_labels() {
        assert_eq!(display_text_from_prompt(Some("Summarize thread 🧵")), "Summarize🧵");
        assert_eq!(display_text_from_prompt(Some("  Is this a good deal? 💰\n")), "Deal?💰");
        assert_eq!(display_text_from_prompt(Some("Explain like I'm 5 👶")), "ELI5👶");
    }

    #[test]
    fn test_fallback_to_first_word() {
        assert_eq!(display_text_from_prompt(Some("Randomly typed text")), "Randomly");
        assert_eq!(display_text_from_prompt(Some("hELLO world")), "Hello");
        assert_eq!(display_text_from_prompt(Some("abc123 def")), "Abc");
        assert_eq!(display_text_from_prompt(Some("x")), "X");
    }

    #[test]
    fn test_non_letter_start_uses_default() {
        assert_eq!(display_text_from_prompt(Some("42 things")), DEFAULT_DISPLAY);
        assert_eq!(display_text_from_prompt(Some("🎉 party")), DEFAULT_DISPLAY);
        assert_eq!(display_text_from_prompt(Some("élan vital")), DEFAULT_DISPLAY);
    }

    #[test]
    fn test_every_builtin_prompt_has_a_label() {
        let registry = PromptRegistry::builtin();
        for def in registry.all_prompts() {
            let label = display_text_from_prompt(Some(&def.display_prompt));
            assert_ne!(label, DEFAULT_DISPLAY, "{}", def.display_prompt);
            assert!(label.chars().count() < def.display_prompt.chars().count());
        }
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(accessible_description("Fact check 🔍"), "Use prompt: Fact check 🔍");
        assert_eq!(badge_title("FactCheck🔍"), "Suggested prompt: FactCheck🔍");
    }
}
