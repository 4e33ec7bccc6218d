//! LLM Orchestrator (C10) façade: wires credential crypto, model
//! selection, the provider client, and usage accounting together behind
//! the [`sentinel_foundation::store::Store`] boundary (§4.9).

use sentinel_foundation::error::SentinelError;
use sentinel_foundation::model::{LlmUsage, SavingsRecord};
use sentinel_foundation::store::Store;

use crate::crypto::Crypto;
use crate::pricing::PriceTable;
use crate::providers::ProviderClient;
use crate::selection::{select_model, Depth, TaskType};
use crate::usage::account_usage;

pub struct LlmOrchestrator {
    crypto: Crypto,
    client: ProviderClient,
    prices: PriceTable,
}

pub struct CompletionOutcome {
    pub content: String,
    pub usage: LlmUsage,
    pub savings: Option<SavingsRecord>,
}

impl LlmOrchestrator {
    /// `encryption_key_b64` is the raw `SENTINEL_ENCRYPTION_KEY` value.
    pub fn new(encryption_key_b64: &str) -> Result<Self, SentinelError> {
        Ok(Self {
            crypto: Crypto::from_base64_key(encryption_key_b64)?,
            client: ProviderClient::new(),
            prices: PriceTable::default(),
        })
    }

    /// Runs one end-to-end completion: loads the stored config, selects a
    /// model, decrypts the credential for the duration of the call only,
    /// invokes the provider, and persists usage/savings.
    pub async fn complete(
        &self,
        store: &dyn Store,
        project_id: &str,
        config_id: &str,
        task_type: TaskType,
        depth: Depth,
        prompt: &str,
        estimated_tokens: u64,
    ) -> Result<CompletionOutcome, SentinelError> {
        let config = store
            .get_llm_config(project_id, config_id)
            .await?
            .ok_or_else(|| SentinelError::internal(format!("no LLM config '{config_id}' for project '{project_id}'")))?;

        let selected = select_model(project_id, task_type, &config, depth, estimated_tokens, &self.prices)?;

        let api_key = self.crypto.decrypt(&config.api_key_encrypted)?;
        let response = self
            .client
            .complete(config.provider, &selected.model, &api_key, config.endpoint.as_deref(), prompt)
            .await?;
        // `api_key` is dropped here; it never outlives this call.

        let (usage, extra_savings) = account_usage(
            project_id,
            config.provider,
            &selected.model,
            response.prompt_tokens,
            response.completion_tokens,
            selected.estimated_cost,
            &self.prices,
            chrono::Utc::now(),
        );
        store.append_llm_usage(usage.clone()).await?;

        let savings = match (selected.savings, extra_savings) {
            (Some(mut s), Some(extra)) => {
                s.savings += extra;
                Some(s)
            }
            (Some(s), None) => Some(s),
            (None, Some(extra)) => Some(SavingsRecord {
                project_id: project_id.to_string(),
                savings: extra,
                was_cap_enforced: false,
            }),
            (None, None) => None,
        };

        Ok(CompletionOutcome {
            content: response.content,
            usage,
            savings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use sentinel_foundation::error::SentinelResult;
    use sentinel_foundation::model::{
        ConfigAuditEntry, CostOpt, IntentDecision, IntentPattern, KeyType, Provider,
    };
    use sentinel_foundation::store::Store;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubStore {
        config: Option<LlmConfigFixture>,
        usages: Mutex<Vec<LlmUsage>>,
    }

    struct LlmConfigFixture(sentinel_foundation::model::LlmConfig);

    #[async_trait]
    impl Store for StubStore {
        async fn get_llm_config(&self, _project_id: &str, _id: &str) -> SentinelResult<Option<sentinel_foundation::model::LlmConfig>> {
            Ok(self.config.as_ref().map(|c| c.0.clone()))
        }
        async fn list_llm_configs(&self, _project_id: &str) -> SentinelResult<Vec<sentinel_foundation::model::LlmConfig>> {
            Ok(vec![])
        }
        async fn put_llm_config(&self, _config: sentinel_foundation::model::LlmConfig) -> SentinelResult<()> {
            Ok(())
        }
        async fn delete_llm_config(&self, _project_id: &str, _id: &str) -> SentinelResult<()> {
            Ok(())
        }
        async fn append_llm_usage(&self, usage: LlmUsage) -> SentinelResult<()> {
            self.usages.lock().unwrap().push(usage);
            Ok(())
        }
        async fn query_llm_usage(
            &self,
            _project_id: &str,
            _from: chrono::DateTime<chrono::Utc>,
            _to: chrono::DateTime<chrono::Utc>,
        ) -> SentinelResult<Vec<LlmUsage>> {
            Ok(vec![])
        }
        async fn upsert_intent_decision(&self, _decision: IntentDecision) -> SentinelResult<String> {
            Ok("decision-1".to_string())
        }
        async fn latest_intent_decisions(&self, _project_id: &str, _limit: usize) -> SentinelResult<Vec<IntentDecision>> {
            Ok(vec![])
        }
        async fn upsert_intent_pattern(&self, _pattern: IntentPattern) -> SentinelResult<()> {
            Ok(())
        }
        async fn list_intent_patterns(&self, _project_id: &str) -> SentinelResult<Vec<IntentPattern>> {
            Ok(vec![])
        }
        async fn append_config_audit(&self, _entry: ConfigAuditEntry) -> SentinelResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn missing_config_surfaces_as_internal_error() {
        let orchestrator = LlmOrchestrator::new(&BASE64.encode([1u8; 32])).unwrap();
        let store = StubStore::default();
        let result = orchestrator
            .complete(&store, "proj-1", "cfg-missing", TaskType::General, Depth::Shallow, "hello", 100)
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn config_round_trips_through_crypto_before_provider_call() {
        let key = BASE64.encode([2u8; 32]);
        let crypto = Crypto::from_base64_key(&key).unwrap();
        let config = sentinel_foundation::model::LlmConfig {
            id: "cfg-1".to_string(),
            project_id: "proj-1".to_string(),
            provider: Provider::OpenAi,
            model: Some("gpt-4".to_string()),
            api_key_encrypted: crypto.encrypt("sk-test").unwrap(),
            key_type: KeyType::Primary,
            endpoint: None,
            cost_opt: CostOpt {
                max_cost_per_request: 0.0,
                ..CostOpt::default()
            },
        };
        let store = StubStore {
            config: Some(LlmConfigFixture(config)),
            usages: Mutex::new(vec![]),
        };

        let decrypted = crypto.decrypt(&store.config.as_ref().unwrap().0.api_key_encrypted).unwrap();
        assert_eq!(decrypted, "sk-test");
    }
}
