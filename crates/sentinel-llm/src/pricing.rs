//! Price table for cost estimation (§4.9, §11.4).
//!
//! Loaded once at orchestrator construction and read-only thereafter (§5
//! Shared resources). Prices are USD per 1,000 tokens.

use std::collections::HashMap;

use sentinel_foundation::model::Provider;

#[derive(Debug, Clone)]
pub struct PriceTable {
    prices: HashMap<(Provider, String), f64>,
}

impl PriceTable {
    pub fn get(&self, provider: Provider, model: &str) -> Option<f64> {
        self.prices.get(&(provider, model.to_string())).copied()
    }

    pub fn with_price(mut self, provider: Provider, model: impl Into<String>, price_per_1k: f64) -> Self {
        self.prices.insert((provider, model.into()), price_per_1k);
        self
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self { prices: HashMap::new() }
            .with_price(Provider::OpenAi, "gpt-3.5-turbo", 0.0015)
            .with_price(Provider::OpenAi, "gpt-4", 0.03)
            .with_price(Provider::Anthropic, "claude-3-haiku", 0.00025)
            .with_price(Provider::Anthropic, "claude-3-opus", 0.015)
            .with_price(Provider::Azure, "gpt-35-turbo", 0.0015)
            .with_price(Provider::Azure, "gpt-4", 0.03)
    }
}

/// The cheaper default model for `provider` (§4.9 model selection step 2/3).
pub fn cheap_default(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAi => "gpt-3.5-turbo",
        Provider::Anthropic => "claude-3-haiku",
        Provider::Azure => "gpt-35-turbo",
    }
}

/// The more capable default model for `provider`.
pub fn expensive_default(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAi => "gpt-4",
        Provider::Anthropic => "claude-3-opus",
        Provider::Azure => "gpt-4",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_prices_every_provider_pair() {
        let table = PriceTable::default();
        for provider in [Provider::OpenAi, Provider::Anthropic, Provider::Azure] {
            assert!(table.get(provider, cheap_default(provider)).is_some());
            assert!(table.get(provider, expensive_default(provider)).is_some());
        }
    }
}
