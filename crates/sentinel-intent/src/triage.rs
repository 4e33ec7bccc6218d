//! Rule-based fallback triage, used when the LLM call fails at any step
//! of the pipeline (§4.10 step 4).

use once_cell::sync::Lazy;
use regex::Regex;
use sentinel_foundation::model::IntentType;

const MAX_LOCATION_PROMPT_LEN: usize = 30;
const DEFAULT_LOCATIONS: [&str; 3] = ["src/", "lib/", "app/"];

static LOCATION_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(where|location|put|place)\b").unwrap());

pub struct TriageResult {
    pub intent_type: IntentType,
    pub options: Vec<String>,
}

/// Falls back to `location_unclear` for short prompts that ask where
/// something goes, defaulting options to `code_path_patterns` when the
/// project has any, else the three conventional roots; otherwise `clear`.
pub fn triage(prompt: &str, code_path_patterns: &[String]) -> TriageResult {
    if LOCATION_KEYWORD.is_match(prompt) && prompt.len() < MAX_LOCATION_PROMPT_LEN {
        let options = if code_path_patterns.is_empty() {
            DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect()
        } else {
            code_path_patterns.to_vec()
        };
        return TriageResult {
            intent_type: IntentType::LocationUnclear,
            options,
        };
    }
    TriageResult {
        intent_type: IntentType::Clear,
        options: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_location_prompt_falls_back_to_location_unclear() {
        let result = triage("where does this go", &[]);
        assert_eq!(result.intent_type, IntentType::LocationUnclear);
        assert_eq!(result.options, vec!["src/".to_string(), "lib/".to_string(), "app/".to_string()]);
    }

    #[test]
    fn location_prompt_prefers_known_code_path_patterns() {
        let patterns = vec!["src/users".to_string(), "src/orders".to_string()];
        let result = triage("where should I put it", &patterns);
        assert_eq!(result.options, patterns);
    }

    #[test]
    fn long_prompt_is_not_triaged_as_location_unclear() {
        let result = triage("where exactly in this large codebase should the new validation middleware live", &[]);
        assert_eq!(result.intent_type, IntentType::Clear);
    }

    #[test]
    fn prompt_without_location_keyword_defaults_to_clear() {
        let result = triage("do the thing", &[]);
        assert_eq!(result.intent_type, IntentType::Clear);
    }
}
