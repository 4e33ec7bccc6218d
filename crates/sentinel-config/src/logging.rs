//! Tracing subscriber initialization (§6 `SENTINEL_LOG_LEVEL`).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AppConfig, LogFormat};

/// Initializes the global tracing subscriber.
///
/// `SENTINEL_LOG_LEVEL` (one of `DEBUG|INFO|WARN|ERROR`) overrides
/// `config.logging.level`; `RUST_LOG` takes precedence over both via
/// `EnvFilter::from_default_env`. Always writes to stderr so stdout stays
/// free for any structured output the caller wants to pipe.
pub fn initialize(config: &AppConfig) {
    let level = std::env::var("SENTINEL_LOG_LEVEL")
        .ok()
        .unwrap_or_else(|| config.logging.level.clone())
        .to_lowercase();
    let level: tracing::Level = level.parse().unwrap_or(tracing::Level::INFO);

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
