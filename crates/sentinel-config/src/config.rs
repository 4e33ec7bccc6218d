//! Application configuration (§6 Environment, §9 design notes on global
//! mutable state): layered defaults → `sentinel.toml` → `SENTINEL__*` env
//! overrides, mirroring the corpus's figment-based config loading.

use sentinel_foundation::error::{SentinelError, SentinelResult};
use sentinel_foundation::model::Thresholds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub concurrency: ConcurrencyConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Enclosing deadline for a full analysis request, in milliseconds (§5 Timeouts).
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7420,
            request_timeout_ms: 120_000,
        }
    }
}

/// Log output format (§6, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// One of `debug|info|warn|error` (§6 `SENTINEL_LOG_LEVEL`).
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    /// Security finding cache TTL, seconds (§4.8, §5 Shared resources).
    pub cache_ttl_seconds: u64,
    /// Files above this size short-circuit rule evaluation (§4.8).
    pub max_file_size_bytes: u64,
    /// AST node-count ceiling before emitting an info finding (§4.8).
    pub max_node_count: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 5 * 60,
            max_file_size_bytes: 10 * 1024 * 1024,
            max_node_count: 100_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcurrencyConfig {
    /// Work-stealing pool size for per-file analysis (§5 Scheduling). `0` means
    /// "use the runtime default" (typically the available parallelism).
    pub worker_threads: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self { worker_threads: 0 }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            security: SecurityConfig::default(),
            concurrency: ConcurrencyConfig::default(),
            thresholds: Thresholds::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration in priority order: `SENTINEL__*` env vars >
    /// `sentinel.toml` (if present) > defaults.
    pub fn load() -> SentinelResult<Self> {
        use figment::providers::{Env, Format, Serialized, Toml};
        use figment::Figment;

        let defaults = serde_json::to_value(AppConfig::default())
            .map_err(|e| SentinelError::internal(format!("failed to serialize default config: {e}")))?;

        let mut figment = Figment::from(Serialized::defaults(defaults));

        let toml_path = std::path::Path::new("sentinel.toml");
        if toml_path.exists() {
            tracing::info!(path = "sentinel.toml", "loading TOML configuration");
            figment = figment.merge(Toml::file(toml_path));
        }

        figment = figment.merge(Env::prefixed("SENTINEL__").split("__").map(|k| k.as_str().replace("__", ".").to_lowercase().into()));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| SentinelError::internal(format!("failed to load configuration: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> SentinelResult<()> {
        if self.server.port == 0 {
            return Err(SentinelError::internal("server port cannot be 0"));
        }
        if self.server.request_timeout_ms == 0 {
            return Err(SentinelError::internal("request timeout cannot be 0"));
        }
        let valid_levels = ["debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(SentinelError::internal(format!(
                "invalid log level '{}', must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }
        if self.thresholds.max_fan_out == 0 {
            return Err(SentinelError::internal("thresholds.maxFanOut cannot be 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_port_fails_validation() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }
}
