//! Usage accounting and reporting (§4.9 "Usage accounting" / "Reports").

use sentinel_foundation::model::{LlmUsage, Provider, SavingsRecord};

use crate::pricing::PriceTable;

/// The period an aggregation request covers (§4.9 `usageStats`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Default30Days,
}

impl Period {
    pub fn days(&self) -> i64 {
        match self {
            Period::Daily => 1,
            Period::Weekly => 7,
            Period::Monthly => 30,
            Period::Yearly => 365,
            Period::Default30Days => 30,
        }
    }
}

/// Records the actual cost of a completed call and, if it came in under
/// the estimate, an additional savings delta (§4.9 "Usage accounting").
pub fn account_usage(
    project_id: &str,
    provider: Provider,
    model: &str,
    prompt_tokens: u64,
    completion_tokens: u64,
    estimated_cost: f64,
    prices: &PriceTable,
    at: chrono::DateTime<chrono::Utc>,
) -> (LlmUsage, Option<f64>) {
    let price = prices.get(provider, model).unwrap_or(0.0);
    let total_tokens = prompt_tokens + completion_tokens;
    let actual_cost = (total_tokens as f64 / 1000.0) * price;

    let extra_savings = (actual_cost < estimated_cost).then_some(estimated_cost - actual_cost);

    let usage = LlmUsage {
        project_id: project_id.to_string(),
        provider,
        model: model.to_string(),
        prompt_tokens,
        completion_tokens,
        actual_cost,
        estimated_cost,
        at,
    };

    (usage, extra_savings)
}

#[derive(Debug, Clone, Default)]
pub struct UsageStats {
    pub total_calls: usize,
    pub total_cost: f64,
    pub total_prompt_tokens: u64,
    pub total_completion_tokens: u64,
}

/// Aggregates `rows` (already filtered to the requested project/period by
/// the caller's `Store` query) into summary totals.
pub fn usage_stats(rows: &[LlmUsage]) -> UsageStats {
    rows.iter().fold(UsageStats::default(), |mut acc, row| {
        acc.total_calls += 1;
        acc.total_cost += row.actual_cost;
        acc.total_prompt_tokens += row.prompt_tokens;
        acc.total_completion_tokens += row.completion_tokens;
        acc
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelCost {
    pub model: String,
    pub cost: f64,
    pub calls: usize,
}

/// Per-model cost breakdown, sorted by descending cost and truncated to
/// the top 10 (§4.9 "Reports").
pub fn cost_breakdown(rows: &[LlmUsage]) -> Vec<ModelCost> {
    use std::collections::HashMap;

    let mut by_model: HashMap<String, ModelCost> = HashMap::new();
    for row in rows {
        let entry = by_model.entry(row.model.clone()).or_insert_with(|| ModelCost {
            model: row.model.clone(),
            cost: 0.0,
            calls: 0,
        });
        entry.cost += row.actual_cost;
        entry.calls += 1;
    }

    let mut breakdown: Vec<ModelCost> = by_model.into_values().collect();
    breakdown.sort_by(|a, b| b.cost.partial_cmp(&a.cost).unwrap_or(std::cmp::Ordering::Equal));
    breakdown.truncate(10);
    breakdown
}

/// A single project's usage report over the queried range (§4.9 `usageReport`).
#[derive(Debug, Clone)]
pub struct UsageReport {
    pub project_id: String,
    pub entries: Vec<LlmUsage>,
    pub stats: UsageStats,
    pub savings: Vec<SavingsRecord>,
}

pub fn usage_report(project_id: &str, entries: Vec<LlmUsage>, savings: Vec<SavingsRecord>) -> UsageReport {
    let stats = usage_stats(&entries);
    UsageReport {
        project_id: project_id.to_string(),
        entries,
        stats,
        savings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn usage(model: &str, cost: f64) -> LlmUsage {
        LlmUsage {
            project_id: "p".to_string(),
            provider: Provider::OpenAi,
            model: model.to_string(),
            prompt_tokens: 100,
            completion_tokens: 50,
            actual_cost: cost,
            estimated_cost: cost,
            at: Utc::now(),
        }
    }

    #[test]
    fn cost_breakdown_sorts_descending_and_caps_at_ten() {
        let rows: Vec<LlmUsage> = (0..15).map(|i| usage(&format!("model-{i}"), i as f64)).collect();
        let breakdown = cost_breakdown(&rows);
        assert_eq!(breakdown.len(), 10);
        assert_eq!(breakdown[0].model, "model-14");
    }

    #[test]
    fn account_usage_reports_savings_when_actual_beats_estimate() {
        let prices = PriceTable::default();
        let (usage, savings) = account_usage("p", Provider::OpenAi, "gpt-3.5-turbo", 100, 50, 1.0, &prices, Utc::now());
        assert!(usage.actual_cost < 1.0);
        assert!(savings.is_some());
    }
}
