//! Provider HTTP clients (§4.9 "Providers").
//!
//! One client handles all three providers; it does not transform prompts,
//! only adapts them to each provider's chat/messages contract. Every call
//! uses a 60s timeout and retries up to 3 times with exponential backoff
//! (1s, 2s, 4s) on a non-2xx response or transport error.

use std::time::Duration;

use sentinel_foundation::error::SentinelError;
use sentinel_foundation::model::Provider;
use serde_json::json;

const TIMEOUT: Duration = Duration::from_secs(60);
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_SECS: [u64; 3] = [1, 2, 4];

pub struct ProviderResponse {
    pub content: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

pub struct ProviderClient {
    http: reqwest::Client,
}

impl ProviderClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(TIMEOUT)
                .build()
                .expect("reqwest client builds with a static timeout"),
        }
    }

    fn provider_name(provider: Provider) -> &'static str {
        match provider {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Azure => "azure",
        }
    }

    fn request_url(&self, provider: Provider, model: &str, endpoint: Option<&str>) -> Result<String, SentinelError> {
        match provider {
            Provider::OpenAi => Ok("https://api.openai.com/v1/chat/completions".to_string()),
            Provider::Anthropic => Ok("https://api.anthropic.com/v1/messages".to_string()),
            Provider::Azure => {
                let base = endpoint.ok_or_else(|| SentinelError::ProviderError {
                    provider: "azure".to_string(),
                    attempts: 0,
                    status: 0,
                })?;
                Ok(format!(
                    "{}/openai/deployments/{model}/chat/completions?api-version=2024-02-01",
                    base.trim_end_matches('/')
                ))
            }
        }
    }

    fn request_body(&self, provider: Provider, model: &str, prompt: &str) -> serde_json::Value {
        match provider {
            Provider::OpenAi | Provider::Azure => json!({
                "model": model,
                "messages": [{ "role": "user", "content": prompt }],
                "max_tokens": 4096,
                "temperature": 0.3,
            }),
            Provider::Anthropic => json!({
                "model": model,
                "max_tokens": 4096,
                "messages": [{ "role": "user", "content": prompt }],
            }),
        }
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder, provider: Provider, api_key: &str) -> reqwest::RequestBuilder {
        match provider {
            Provider::OpenAi => builder.bearer_auth(api_key),
            Provider::Azure => builder.header("api-key", api_key),
            Provider::Anthropic => builder.header("x-api-key", api_key).header("anthropic-version", "2023-06-01"),
        }
    }

    fn parse_response(&self, provider: Provider, body: &serde_json::Value) -> Option<ProviderResponse> {
        match provider {
            Provider::OpenAi | Provider::Azure => {
                let content = body["choices"][0]["message"]["content"].as_str()?.to_string();
                let prompt_tokens = body["usage"]["prompt_tokens"].as_u64().unwrap_or(0);
                let completion_tokens = body["usage"]["completion_tokens"].as_u64().unwrap_or(0);
                Some(ProviderResponse {
                    content,
                    prompt_tokens,
                    completion_tokens,
                })
            }
            Provider::Anthropic => {
                let content = body["content"][0]["text"].as_str()?.to_string();
                let prompt_tokens = body["usage"]["input_tokens"].as_u64().unwrap_or(0);
                let completion_tokens = body["usage"]["output_tokens"].as_u64().unwrap_or(0);
                Some(ProviderResponse {
                    content,
                    prompt_tokens,
                    completion_tokens,
                })
            }
        }
    }

    /// Sends `prompt` to `provider`/`model`, retrying on failure per the
    /// backoff schedule above.
    pub async fn complete(
        &self,
        provider: Provider,
        model: &str,
        api_key: &str,
        endpoint: Option<&str>,
        prompt: &str,
    ) -> Result<ProviderResponse, SentinelError> {
        let url = self.request_url(provider, model, endpoint)?;
        let body = self.request_body(provider, model, prompt);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let builder = self.apply_auth(self.http.post(&url).json(&body), provider, api_key);

            match builder.send().await {
                Ok(response) if response.status().is_success() => {
                    let json: serde_json::Value = response.json().await.map_err(|_| SentinelError::ProviderError {
                        provider: Self::provider_name(provider).to_string(),
                        attempts: attempt,
                        status: 200,
                    })?;
                    return self.parse_response(provider, &json).ok_or_else(|| SentinelError::ProviderError {
                        provider: Self::provider_name(provider).to_string(),
                        attempts: attempt,
                        status: 200,
                    });
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    if attempt >= MAX_ATTEMPTS {
                        return Err(SentinelError::ProviderError {
                            provider: Self::provider_name(provider).to_string(),
                            attempts: attempt,
                            status,
                        });
                    }
                }
                Err(_) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(SentinelError::ProviderError {
                            provider: Self::provider_name(provider).to_string(),
                            attempts: attempt,
                            status: 0,
                        });
                    }
                }
            }

            let backoff = BACKOFF_SECS[(attempt - 1) as usize];
            tokio::time::sleep(Duration::from_secs(backoff)).await;
        }
    }
}

impl Default for ProviderClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn azure_requires_explicit_endpoint() {
        let client = ProviderClient::new();
        let result = client.request_url(Provider::Azure, "gpt-4", None);
        assert!(result.is_err(), "azure endpoint must never be derived from provider/model");
    }

    #[test]
    fn azure_endpoint_is_used_verbatim() {
        let client = ProviderClient::new();
        let url = client.request_url(Provider::Azure, "gpt-4", Some("https://my-resource.openai.azure.com")).unwrap();
        assert!(url.starts_with("https://my-resource.openai.azure.com/openai/deployments/gpt-4"));
    }

    #[test]
    fn openai_and_anthropic_use_their_fixed_endpoints() {
        let client = ProviderClient::new();
        assert_eq!(
            client.request_url(Provider::OpenAi, "gpt-4", None).unwrap(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            client.request_url(Provider::Anthropic, "claude-3-haiku", None).unwrap(),
            "https://api.anthropic.com/v1/messages"
        );
    }
}
