//! Configuration loading and logging initialization (§6, §9).

mod config;
mod logging;

pub use config::{AppConfig, ConcurrencyConfig, LogFormat, LoggingConfig, SecurityConfig, ServerConfig};
pub use logging::initialize as init_logging;
