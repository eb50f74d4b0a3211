//! Configuration loading and layering.

mod loader;

pub use loader::{ApiConfig, ChatConfig, Config, ConfigError};
