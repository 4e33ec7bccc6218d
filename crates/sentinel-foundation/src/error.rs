//! Error handling for the Sentinel Hub code analysis core.
//!
//! Mirrors the error kinds enumerated in the specification's error-handling
//! design: each kind carries just enough context to decide retryability and
//! to build a user-facing [`ApiError`] without leaking sensitive fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Internal error type used throughout the analysis core.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SentinelError {
    #[error("failed to parse {language} source: {message}")]
    ParseFailure { language: String, message: String },

    #[error("could not resolve import target: {target}")]
    ResolverMiss { target: String },

    #[error("framework could not be determined with confidence; rule '{rule_id}' skipped")]
    FrameworkUnknown { rule_id: String },

    #[error("estimated cost {estimated:.4} exceeds cap {cap:.4} for model {model}")]
    CostLimitExceeded {
        estimated: f64,
        cap: f64,
        model: String,
    },

    #[error("provider {provider} request failed after {attempts} attempts: HTTP {status}")]
    ProviderError {
        provider: String,
        attempts: u32,
        status: u16,
    },

    #[error("credential crypto operation failed: {operation}")]
    CryptoFailure { operation: String },

    #[error("store operation failed: {operation}")]
    StoreFailure { operation: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl SentinelError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the caller may usefully retry the operation that produced this error.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            SentinelError::ProviderError { .. } | SentinelError::StoreFailure { .. }
        )
    }
}

pub type SentinelResult<T> = Result<T, SentinelError>;

/// Standardized, serializable error codes for API responses.
pub mod error_codes {
    pub const E2000_PARSE_FAILURE: &str = "E2000";
    pub const E2001_RESOLVER_MISS: &str = "E2001";
    pub const E2002_FRAMEWORK_UNKNOWN: &str = "E2002";
    pub const E2003_COST_LIMIT_EXCEEDED: &str = "E2003";
    pub const E2004_PROVIDER_ERROR: &str = "E2004";
    pub const E2005_CRYPTO_FAILURE: &str = "E2005";
    pub const E2006_STORE_FAILURE: &str = "E2006";
    pub const E2007_INTERNAL: &str = "E2007";
}

/// Structured, user-visible error shape (§7): `{kind, message, retryable, details}`.
/// Never carries API keys or decrypted credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: String,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            retryable,
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<&SentinelError> for ApiError {
    fn from(err: &SentinelError) -> Self {
        use error_codes::*;
        let retryable = err.retryable();
        match err {
            SentinelError::ParseFailure { language, message } => ApiError::new(
                E2000_PARSE_FAILURE,
                format!("failed to parse {language} source: {message}"),
                retryable,
            ),
            SentinelError::ResolverMiss { target } => ApiError::new(
                E2001_RESOLVER_MISS,
                format!("could not resolve import target: {target}"),
                retryable,
            ),
            SentinelError::FrameworkUnknown { rule_id } => ApiError::new(
                E2002_FRAMEWORK_UNKNOWN,
                format!("framework unknown, rule '{rule_id}' skipped"),
                retryable,
            ),
            SentinelError::CostLimitExceeded {
                estimated,
                cap,
                model,
            } => ApiError::new(
                E2003_COST_LIMIT_EXCEEDED,
                format!("estimated cost {estimated:.4} exceeds cap {cap:.4} for model {model}"),
                retryable,
            ),
            SentinelError::ProviderError {
                provider,
                attempts,
                status,
            } => ApiError::new(
                E2004_PROVIDER_ERROR,
                format!("{provider} failed after {attempts} attempts (HTTP {status})"),
                retryable,
            ),
            SentinelError::CryptoFailure { operation } => ApiError::new(
                E2005_CRYPTO_FAILURE,
                format!("crypto operation failed: {operation}"),
                retryable,
            ),
            SentinelError::StoreFailure { operation } => ApiError::new(
                E2006_STORE_FAILURE,
                format!("store operation failed: {operation}"),
                retryable,
            ),
            SentinelError::Io(e) => {
                ApiError::new(E2007_INTERNAL, format!("I/O error: {e}"), retryable)
            }
            SentinelError::Json(e) => {
                ApiError::new(E2007_INTERNAL, format!("JSON error: {e}"), retryable)
            }
            SentinelError::Internal { message } => {
                ApiError::new(E2007_INTERNAL, message.clone(), retryable)
            }
        }
    }
}

impl From<SentinelError> for ApiError {
    fn from(err: SentinelError) -> Self {
        ApiError::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_never_carries_raw_credentials_field() {
        let err = SentinelError::CryptoFailure {
            operation: "decrypt".into(),
        };
        let api: ApiError = err.into();
        assert_eq!(api.kind, error_codes::E2005_CRYPTO_FAILURE);
        assert!(api.details.is_none());
    }

    #[test]
    fn provider_and_store_errors_are_retryable() {
        let provider = SentinelError::ProviderError {
            provider: "openai".into(),
            attempts: 3,
            status: 500,
        };
        assert!(provider.retryable());

        let parse = SentinelError::ParseFailure {
            language: "go".into(),
            message: "unexpected token".into(),
        };
        assert!(!parse.retryable());
    }
}
