//! The `Store` contract (§6): the core never talks to a database directly,
//! it calls through this trait. Implementations live outside this crate
//! (e.g. against a relational database); `sentinel-test-support` ships an
//! in-memory one for tests.

use crate::error::SentinelResult;
use crate::model::{ConfigAuditEntry, IntentDecision, IntentPattern, LlmConfig, LlmUsage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Thread-safe persistence boundary for the analysis core.
///
/// Implementations are assumed thread-safe (§5); the core itself serializes
/// the decision-upsert + pattern-upsert pair into one logical transaction by
/// calling [`Store::upsert_intent_decision`] and
/// [`Store::upsert_intent_pattern`] back to back under a single await point,
/// trusting the implementation to make that pair atomic.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_llm_config(&self, project_id: &str, id: &str) -> SentinelResult<Option<LlmConfig>>;
    async fn list_llm_configs(&self, project_id: &str) -> SentinelResult<Vec<LlmConfig>>;
    async fn put_llm_config(&self, config: LlmConfig) -> SentinelResult<()>;
    async fn delete_llm_config(&self, project_id: &str, id: &str) -> SentinelResult<()>;

    async fn append_llm_usage(&self, usage: LlmUsage) -> SentinelResult<()>;
    async fn query_llm_usage(
        &self,
        project_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SentinelResult<Vec<LlmUsage>>;

    async fn upsert_intent_decision(&self, decision: IntentDecision) -> SentinelResult<String>;
    async fn latest_intent_decisions(
        &self,
        project_id: &str,
        limit: usize,
    ) -> SentinelResult<Vec<IntentDecision>>;

    async fn upsert_intent_pattern(&self, pattern: IntentPattern) -> SentinelResult<()>;
    async fn list_intent_patterns(&self, project_id: &str) -> SentinelResult<Vec<IntentPattern>>;

    async fn append_config_audit(&self, entry: ConfigAuditEntry) -> SentinelResult<()>;
}
