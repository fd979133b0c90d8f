//! Configuration loading for the demo runner.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, LoadConfig, LoggingConfig, MAX_DELAY_MS};
