//! Model selection (§4.9 `selectModel`).

use sentinel_foundation::error::SentinelError;
use sentinel_foundation::model::{LlmConfig, SavingsRecord};

use crate::pricing::{cheap_default, expensive_default, PriceTable};

/// Task categories the orchestrator classifies a request into, used to pick
/// a sensible default model when none is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    BusinessRuleValidation,
    SecurityAnalysis,
    SemanticAnalysis,
    RequirementCompliance,
    General,
}

fn is_critical(task: TaskType) -> bool {
    matches!(
        task,
        TaskType::BusinessRuleValidation
            | TaskType::SecurityAnalysis
            | TaskType::SemanticAnalysis
            | TaskType::RequirementCompliance
    )
}

/// Analysis depth, biasing default-model selection toward cheaper or more
/// capable models (§4.9 step 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Shallow,
    Medium,
    Deep,
}

pub struct SelectedModel {
    pub model: String,
    pub estimated_cost: f64,
    pub savings: Option<SavingsRecord>,
}

fn estimate_cost(provider: sentinel_foundation::model::Provider, model: &str, estimated_tokens: u64, prices: &PriceTable) -> f64 {
    let price = prices.get(provider, model).unwrap_or(0.0);
    (estimated_tokens as f64 / 1000.0) * price
}

/// Implements §4.9's four-step `selectModel`.
pub fn select_model(
    project_id: &str,
    task_type: TaskType,
    config: &LlmConfig,
    depth: Depth,
    estimated_tokens: u64,
    prices: &PriceTable,
) -> Result<SelectedModel, SentinelError> {
    let provider = config.provider;
    let cap = config.cost_opt.max_cost_per_request;

    // Step 1: an explicit model with no cap is used unconditionally.
    if let Some(model) = &config.model {
        if cap == 0.0 {
            let estimated_cost = estimate_cost(provider, model, estimated_tokens, prices);
            return Ok(SelectedModel {
                model: model.clone(),
                estimated_cost,
                savings: None,
            });
        }
    }

    // Step 3: no configured model — classify by task criticality and depth.
    let mut chosen = config.model.clone().unwrap_or_else(|| {
        let wants_expensive = is_critical(task_type) || depth == Depth::Deep;
        let wants_cheap = !is_critical(task_type) && depth == Depth::Medium;
        if wants_expensive && !wants_cheap {
            expensive_default(provider).to_string()
        } else {
            cheap_default(provider).to_string()
        }
    });

    let mut estimated_cost = estimate_cost(provider, &chosen, estimated_tokens, prices);

    // Step 2: enforce the per-request cap, substituting the cheaper default.
    if cap > 0.0 && estimated_cost > cap {
        let substitute = cheap_default(provider).to_string();
        if substitute == chosen {
            return Err(SentinelError::CostLimitExceeded {
                estimated: estimated_cost,
                cap,
                model: chosen,
            });
        }
        let substitute_cost = estimate_cost(provider, &substitute, estimated_tokens, prices);
        if substitute_cost > cap {
            return Err(SentinelError::CostLimitExceeded {
                estimated: substitute_cost,
                cap,
                model: substitute,
            });
        }
        let savings = estimated_cost - substitute_cost;
        chosen = substitute;
        estimated_cost = substitute_cost;
        return Ok(SelectedModel {
            model: chosen,
            estimated_cost,
            savings: Some(SavingsRecord {
                project_id: project_id.to_string(),
                savings,
                was_cap_enforced: true,
            }),
        });
    }

    Ok(SelectedModel {
        model: chosen,
        estimated_cost,
        savings: None,
    })
}
