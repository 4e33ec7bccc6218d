//! Clarity classification, structured-prompt JSON extraction, and
//! clarifying-question templates (§4.10 steps 1, 3, 5).

use once_cell::sync::Lazy;
use regex::Regex;
use sentinel_foundation::model::IntentType;

const ACTION_VERBS: [&str; 7] = ["create", "add", "implement", "fix", "update", "delete", "remove"];

static PATH_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/\\]").unwrap());
static TYPE_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(function|class)\b").unwrap());

/// §4.10 step 1: a prompt is clear on its face if it already names a path,
/// a code construct, or an action verb and is reasonably long.
pub fn is_clear_prompt(prompt: &str) -> bool {
    if PATH_SEPARATOR.is_match(prompt) || TYPE_KEYWORD.is_match(prompt) {
        return true;
    }
    if prompt.len() > 20 {
        let lower = prompt.to_lowercase();
        if ACTION_VERBS.iter().any(|verb| lower.contains(verb)) {
            return true;
        }
    }
    false
}

/// Extracts the first balanced `{...}` substring, tolerant of an LLM
/// wrapping its JSON in prose or a markdown code fence.
pub fn extract_first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        let ch = byte as char;
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// The raw shape the LLM is asked to return in step 3's structured prompt.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct StructuredResponse {
    pub requires_clarification: bool,
    pub intent_type: IntentType,
    pub confidence: f64,
    #[serde(default)]
    pub clarifying_question: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub suggested_action: Option<String>,
}

/// Renders a clarifying question from the intent-type template (§4.10 step 5),
/// used only when the LLM or rule-based triage left the question blank.
pub fn render_template(intent_type: IntentType, options: &[String]) -> Option<String> {
    match intent_type {
        IntentType::LocationUnclear => {
            let (a, b) = (options.first().map(String::as_str).unwrap_or("src/"), options.get(1).map(String::as_str).unwrap_or("lib/"));
            Some(format!("Where should this go?\n1. {a}\n2. {b}"))
        }
        IntentType::EntityUnclear => {
            let subject = options.first().map(String::as_str).unwrap_or("entity");
            let (a, b) = (options.get(1).map(String::as_str).unwrap_or("option A"), options.get(2).map(String::as_str).unwrap_or("option B"));
            Some(format!("Which {subject}?\n1. {a}\n2. {b}"))
        }
        IntentType::ActionConfirm => {
            let action = options.first().map(String::as_str).unwrap_or("proceed");
            Some(format!("I will {action}. Correct? [Y/n]"))
        }
        IntentType::Clear | IntentType::Ambiguous => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_containing_prompt_is_clear() {
        assert!(is_clear_prompt("create user handler in src/users/handler.go"));
    }

    #[test]
    fn short_ambiguous_prompt_is_not_clear() {
        assert!(!is_clear_prompt("fix it"));
    }

    #[test]
    fn action_verb_with_enough_length_is_clear() {
        assert!(is_clear_prompt("implement the caching layer properly"));
    }

    #[test]
    fn extracts_json_object_embedded_in_prose() {
        let text = "Sure, here you go:\n{\"requires_clarification\": true, \"intent_type\": \"location_unclear\"}\nHope that helps.";
        let extracted = extract_first_json_object(text).unwrap();
        assert_eq!(extracted, "{\"requires_clarification\": true, \"intent_type\": \"location_unclear\"}");
    }

    #[test]
    fn extraction_handles_nested_braces_and_string_escapes() {
        let text = r#"{"a": {"b": 1}, "c": "text with \"quoted\" brace } inside"}"#;
        let extracted = extract_first_json_object(text).unwrap();
        assert_eq!(extracted, text);
    }

    #[test]
    fn renders_location_unclear_template_with_options_in_order() {
        let options = vec!["src/".to_string(), "lib/".to_string()];
        let rendered = render_template(IntentType::LocationUnclear, &options).unwrap();
        assert_eq!(rendered, "Where should this go?\n1. src/\n2. lib/");
    }

    #[test]
    fn renders_action_confirm_template() {
        let options = vec!["delete the config file".to_string()];
        let rendered = render_template(IntentType::ActionConfirm, &options).unwrap();
        assert_eq!(rendered, "I will delete the config file. Correct? [Y/n]");
    }
}
