//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and the default collaborator URL so a rename only requires changing
//! this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "codecritic";

/// Local config filename (e.g. `.codecritic.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".codecritic.toml";

/// Directory name under `~/.config/` for global config, and under
/// `~/.local/share/` for the persisted snippet and comment stores.
pub const CONFIG_DIR: &str = "codecritic";

/// Default base URL of the review API when no config or env override is set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// CLI version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Environment variable names ──────────────────────────────────────

pub const ENV_API_URL: &str = "CODECRITIC_API_URL";
pub const ENV_API_TOKEN: &str = "CODECRITIC_API_TOKEN";
pub const ENV_CHAT_WINDOW: &str = "CODECRITIC_CHAT_WINDOW";
