//! An in-memory [`Store`] for tests — no database required.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sentinel_foundation::error::SentinelResult;
use sentinel_foundation::model::{ConfigAuditEntry, IntentDecision, IntentPattern, LlmConfig, LlmUsage};
use sentinel_foundation::store::Store;

#[derive(Default)]
pub struct InMemoryStore {
    llm_configs: Mutex<HashMap<(String, String), LlmConfig>>,
    llm_usage: Mutex<Vec<LlmUsage>>,
    intent_decisions: Mutex<Vec<IntentDecision>>,
    intent_patterns: Mutex<HashMap<(String, String, String), IntentPattern>>,
    config_audit: Mutex<Vec<ConfigAuditEntry>>,
    next_decision_id: Mutex<u64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get_llm_config(&self, project_id: &str, id: &str) -> SentinelResult<Option<LlmConfig>> {
        Ok(self.llm_configs.lock().unwrap().get(&(project_id.to_string(), id.to_string())).cloned())
    }

    async fn list_llm_configs(&self, project_id: &str) -> SentinelResult<Vec<LlmConfig>> {
        Ok(self
            .llm_configs
            .lock()
            .unwrap()
            .values()
            .filter(|config| config.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn put_llm_config(&self, config: LlmConfig) -> SentinelResult<()> {
        self.llm_configs.lock().unwrap().insert((config.project_id.clone(), config.id.clone()), config);
        Ok(())
    }

    async fn delete_llm_config(&self, project_id: &str, id: &str) -> SentinelResult<()> {
        self.llm_configs.lock().unwrap().remove(&(project_id.to_string(), id.to_string()));
        Ok(())
    }

    async fn append_llm_usage(&self, usage: LlmUsage) -> SentinelResult<()> {
        self.llm_usage.lock().unwrap().push(usage);
        Ok(())
    }

    async fn query_llm_usage(&self, project_id: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> SentinelResult<Vec<LlmUsage>> {
        Ok(self
            .llm_usage
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.project_id == project_id && row.at >= from && row.at <= to)
            .cloned()
            .collect())
    }

    async fn upsert_intent_decision(&self, mut decision: IntentDecision) -> SentinelResult<String> {
        let id = if let Some(id) = &decision.id {
            id.clone()
        } else {
            let mut counter = self.next_decision_id.lock().unwrap();
            *counter += 1;
            format!("decision-{}", *counter)
        };
        decision.id = Some(id.clone());

        let mut decisions = self.intent_decisions.lock().unwrap();
        if let Some(existing) = decisions.iter_mut().find(|d| d.id.as_deref() == Some(id.as_str())) {
            *existing = decision;
        } else {
            decisions.push(decision);
        }
        Ok(id)
    }

    async fn latest_intent_decisions(&self, project_id: &str, limit: usize) -> SentinelResult<Vec<IntentDecision>> {
        let decisions = self.intent_decisions.lock().unwrap();
        let mut matching: Vec<IntentDecision> = decisions.iter().filter(|d| d.project_id == project_id).cloned().collect();
        matching.sort_by_key(|d| std::cmp::Reverse(d.created_at));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn upsert_intent_pattern(&self, pattern: IntentPattern) -> SentinelResult<()> {
        let key = (pattern.project_id.clone(), pattern.pattern_type.clone(), pattern.pattern_data.clone());
        let mut patterns = self.intent_patterns.lock().unwrap();
        patterns
            .entry(key)
            .and_modify(|existing| {
                existing.frequency += pattern.frequency;
                existing.last_used = pattern.last_used;
            })
            .or_insert(pattern);
        Ok(())
    }

    async fn list_intent_patterns(&self, project_id: &str) -> SentinelResult<Vec<IntentPattern>> {
        Ok(self
            .intent_patterns
            .lock()
            .unwrap()
            .values()
            .filter(|pattern| pattern.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn append_config_audit(&self, entry: ConfigAuditEntry) -> SentinelResult<()> {
        self.config_audit.lock().unwrap().push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_foundation::model::{CostOpt, KeyType, Provider};

    fn config(id: &str) -> LlmConfig {
        LlmConfig {
            id: id.to_string(),
            project_id: "proj-1".to_string(),
            provider: Provider::OpenAi,
            model: Some("gpt-4".to_string()),
            api_key_encrypted: vec![],
            key_type: KeyType::Primary,
            endpoint: None,
            cost_opt: CostOpt::default(),
        }
    }

    #[tokio::test]
    async fn put_then_get_round_trips_a_config() {
        let store = InMemoryStore::new();
        store.put_llm_config(config("cfg-1")).await.unwrap();
        let fetched = store.get_llm_config("proj-1", "cfg-1").await.unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn upsert_intent_pattern_accumulates_frequency_on_repeat_key() {
        let store = InMemoryStore::new();
        let pattern = IntentPattern {
            project_id: "proj-1".to_string(),
            pattern_type: "location_unclear".to_string(),
            pattern_data: "src/".to_string(),
            frequency: 1,
            last_used: Utc::now(),
            created_at: Utc::now(),
        };
        store.upsert_intent_pattern(pattern.clone()).await.unwrap();
        store.upsert_intent_pattern(pattern).await.unwrap();

        let patterns = store.list_intent_patterns("proj-1").await.unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].frequency, 2);
    }

    #[tokio::test]
    async fn latest_intent_decisions_are_sorted_newest_first_and_capped() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            let decision = IntentDecision {
                id: None,
                project_id: "proj-1".to_string(),
                original_prompt: format!("prompt {i}"),
                intent_type: sentinel_foundation::model::IntentType::Clear,
                clarifying_question: None,
                user_choice: None,
                resolved_prompt: None,
                context_data: serde_json::Value::Null,
                created_at: Utc::now() + chrono::Duration::seconds(i),
            };
            store.upsert_intent_decision(decision).await.unwrap();
        }
        let latest = store.latest_intent_decisions("proj-1", 2).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].original_prompt, "prompt 4");
    }
}
