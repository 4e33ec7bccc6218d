//! The intent clarification pipeline: clarity short-circuit, context
//! gathering, structured LLM classification with rule-based fallback, and
//! decision/pattern persistence (§4.10 steps 1, 3-7).

use std::path::Path;

use chrono::Utc;
use sentinel_foundation::error::SentinelResult;
use sentinel_foundation::model::{IntentDecision, IntentPattern, IntentType};
use sentinel_foundation::store::Store;
use sentinel_llm::{Depth, LlmOrchestrator, TaskType};

use crate::context::{gather_context, ContextData};
use crate::prompt::{extract_first_json_object, is_clear_prompt, render_template, StructuredResponse};
use crate::triage::triage;

const REFINEMENT_WINDOW: usize = 20;

fn structured_prompt(prompt: &str, context: &ContextData) -> String {
    format!(
        "A developer gave this instruction: \"{prompt}\".\n\
         Recent files: {:?}\n\
         Top-level directories: {:?}\n\
         Known business rules: {:?}\n\
         Code path patterns: {:?}\n\
         Respond with a single JSON object only, no prose, shaped as:\n\
         {{\"requires_clarification\": bool, \"intent_type\": \"clear\"|\"location_unclear\"|\"entity_unclear\"|\"action_confirm\"|\"ambiguous\", \
         \"confidence\": number, \"clarifying_question\": string|null, \"options\": [string], \"suggested_action\": string|null}}",
        context.recent_files, context.top_level_dirs, context.business_rules, context.code_path_patterns
    )
}

async fn classify(
    orchestrator: &LlmOrchestrator,
    store: &dyn Store,
    project_id: &str,
    config_id: &str,
    prompt: &str,
    context: &ContextData,
) -> Option<StructuredResponse> {
    let outcome = orchestrator
        .complete(store, project_id, config_id, TaskType::General, Depth::Shallow, &structured_prompt(prompt, context), 800)
        .await
        .ok()?;
    let json = extract_first_json_object(&outcome.content)?;
    serde_json::from_str::<StructuredResponse>(json).ok()
}

/// Runs the full pipeline for one prompt and persists the resulting decision.
pub async fn analyze_intent(
    store: &dyn Store,
    orchestrator: &LlmOrchestrator,
    project_root: &Path,
    project_id: &str,
    config_id: &str,
    prompt: &str,
) -> SentinelResult<IntentDecision> {
    if is_clear_prompt(prompt) {
        return persist_decision(store, project_id, prompt, IntentType::Clear, None, serde_json::Value::Null).await;
    }

    let context = gather_context(project_root, store, project_id).await?;

    let (intent_type, clarifying_question, options) = match classify(orchestrator, store, project_id, config_id, prompt, &context).await {
        Some(response) => {
            let intent_type = if response.requires_clarification { response.intent_type } else { IntentType::Clear };
            (intent_type, response.clarifying_question, response.options)
        }
        None => {
            let triaged = triage(prompt, &context.code_path_patterns);
            (triaged.intent_type, None, triaged.options)
        }
    };

    let clarifying_question = clarifying_question
        .filter(|question| !question.is_empty())
        .or_else(|| render_template(intent_type, &options));

    let context_json = serde_json::to_value(&context).unwrap_or(serde_json::Value::Null);
    persist_decision(store, project_id, prompt, intent_type, clarifying_question, context_json).await
}

async fn persist_decision(
    store: &dyn Store,
    project_id: &str,
    prompt: &str,
    intent_type: IntentType,
    clarifying_question: Option<String>,
    context_data: serde_json::Value,
) -> SentinelResult<IntentDecision> {
    let mut decision = IntentDecision {
        id: None,
        project_id: project_id.to_string(),
        original_prompt: prompt.to_string(),
        intent_type,
        clarifying_question,
        user_choice: None,
        resolved_prompt: None,
        context_data,
        created_at: Utc::now(),
    };
    let id = store.upsert_intent_decision(decision.clone()).await?;
    decision.id = Some(id);

    if !matches!(intent_type, IntentType::Clear) {
        let pattern = IntentPattern {
            project_id: project_id.to_string(),
            pattern_type: pattern_type_for(intent_type),
            pattern_data: decision.clarifying_question.clone().unwrap_or_default(),
            frequency: 1,
            last_used: decision.created_at,
            created_at: decision.created_at,
        };
        store.upsert_intent_pattern(pattern).await?;
    }

    Ok(decision)
}

fn pattern_type_for(intent_type: IntentType) -> String {
    match intent_type {
        IntentType::Clear => "clear",
        IntentType::LocationUnclear => "location_unclear",
        IntentType::EntityUnclear => "entity_unclear",
        IntentType::ActionConfirm => "action_confirm",
        IntentType::Ambiguous => "ambiguous",
    }
    .to_string()
}

/// §4.10 step 7: aggregates the most recent decisions into refreshed
/// pattern frequencies. Intended to be invoked periodically, not per-request.
pub async fn refine_patterns(store: &dyn Store, project_id: &str) -> SentinelResult<()> {
    let recent = store.latest_intent_decisions(project_id, REFINEMENT_WINDOW).await?;
    let mut tallies: std::collections::HashMap<(String, String), u32> = std::collections::HashMap::new();

    for decision in &recent {
        if matches!(decision.intent_type, IntentType::Clear) {
            continue;
        }
        let key = (pattern_type_for(decision.intent_type), decision.clarifying_question.clone().unwrap_or_default());
        *tallies.entry(key).or_insert(0) += 1;
    }

    let now = Utc::now();
    for ((pattern_type, pattern_data), frequency) in tallies {
        let pattern = IntentPattern {
            project_id: project_id.to_string(),
            pattern_type,
            pattern_data,
            frequency,
            last_used: now,
            created_at: now,
        };
        store.upsert_intent_pattern(pattern).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use base64::Engine;
    use sentinel_foundation::error::SentinelResult as Res;
    use sentinel_foundation::model::{ConfigAuditEntry, LlmConfig, LlmUsage};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubStore {
        decisions: Mutex<Vec<IntentDecision>>,
        patterns: Mutex<Vec<IntentPattern>>,
    }

    #[async_trait]
    impl Store for StubStore {
        async fn get_llm_config(&self, _project_id: &str, _id: &str) -> Res<Option<LlmConfig>> {
            Ok(None)
        }
        async fn list_llm_configs(&self, _project_id: &str) -> Res<Vec<LlmConfig>> {
            Ok(vec![])
        }
        async fn put_llm_config(&self, _config: LlmConfig) -> Res<()> {
            Ok(())
        }
        async fn delete_llm_config(&self, _project_id: &str, _id: &str) -> Res<()> {
            Ok(())
        }
        async fn append_llm_usage(&self, _usage: LlmUsage) -> Res<()> {
            Ok(())
        }
        async fn query_llm_usage(&self, _project_id: &str, _from: chrono::DateTime<Utc>, _to: chrono::DateTime<Utc>) -> Res<Vec<LlmUsage>> {
            Ok(vec![])
        }
        async fn upsert_intent_decision(&self, decision: IntentDecision) -> Res<String> {
            self.decisions.lock().unwrap().push(decision);
            Ok(format!("decision-{}", self.decisions.lock().unwrap().len()))
        }
        async fn latest_intent_decisions(&self, _project_id: &str, limit: usize) -> Res<Vec<IntentDecision>> {
            let decisions = self.decisions.lock().unwrap();
            Ok(decisions.iter().rev().take(limit).cloned().collect())
        }
        async fn upsert_intent_pattern(&self, pattern: IntentPattern) -> Res<()> {
            self.patterns.lock().unwrap().push(pattern);
            Ok(())
        }
        async fn list_intent_patterns(&self, _project_id: &str) -> Res<Vec<IntentPattern>> {
            Ok(self.patterns.lock().unwrap().clone())
        }
        async fn append_config_audit(&self, _entry: ConfigAuditEntry) -> Res<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn clear_prompt_short_circuits_without_persisting_a_pattern() {
        let store = StubStore::default();
        let orchestrator = LlmOrchestrator::new(&base64::engine::general_purpose::STANDARD.encode([3u8; 32])).unwrap();
        let tmp = tempfile::tempdir().unwrap();

        let decision = analyze_intent(&store, &orchestrator, tmp.path(), "proj-1", "cfg-1", "create user handler in src/users/handler.go")
            .await
            .unwrap();

        assert_eq!(decision.intent_type, IntentType::Clear);
        assert!(decision.clarifying_question.is_none());
        assert!(store.patterns.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unclear_prompt_falls_back_to_rule_based_triage_when_llm_unconfigured() {
        let store = StubStore::default();
        let orchestrator = LlmOrchestrator::new(&base64::engine::general_purpose::STANDARD.encode([4u8; 32])).unwrap();
        let tmp = tempfile::tempdir().unwrap();

        let decision = analyze_intent(&store, &orchestrator, tmp.path(), "proj-1", "cfg-missing", "where does it go")
            .await
            .unwrap();

        assert_eq!(decision.intent_type, IntentType::LocationUnclear);
        assert!(decision.clarifying_question.is_some());
        assert_eq!(store.patterns.lock().unwrap().len(), 1);
    }
}
