//! A `mockall`-generated mock of the [`Store`] trait, for tests that need
//! to assert on specific calls rather than observe persisted state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use sentinel_foundation::error::SentinelResult;
use sentinel_foundation::model::{ConfigAuditEntry, IntentDecision, IntentPattern, LlmConfig, LlmUsage};
use sentinel_foundation::store::Store;

mock! {
    pub Store {}

    #[async_trait]
    impl Store for Store {
        async fn get_llm_config(&self, project_id: &str, id: &str) -> SentinelResult<Option<LlmConfig>>;
        async fn list_llm_configs(&self, project_id: &str) -> SentinelResult<Vec<LlmConfig>>;
        async fn put_llm_config(&self, config: LlmConfig) -> SentinelResult<()>;
        async fn delete_llm_config(&self, project_id: &str, id: &str) -> SentinelResult<()>;
        async fn append_llm_usage(&self, usage: LlmUsage) -> SentinelResult<()>;
        async fn query_llm_usage(&self, project_id: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> SentinelResult<Vec<LlmUsage>>;
        async fn upsert_intent_decision(&self, decision: IntentDecision) -> SentinelResult<String>;
        async fn latest_intent_decisions(&self, project_id: &str, limit: usize) -> SentinelResult<Vec<IntentDecision>>;
        async fn upsert_intent_pattern(&self, pattern: IntentPattern) -> SentinelResult<()>;
        async fn list_intent_patterns(&self, project_id: &str) -> SentinelResult<Vec<IntentPattern>>;
        async fn append_config_audit(&self, entry: ConfigAuditEntry) -> SentinelResult<()>;
    }
}
