//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.codecritic.toml` in the working directory
//! 4. `~/.config/codecritic/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::chat::CONTEXT_WINDOW;
use crate::constants;
use crate::env::Env;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub chat: ChatConfig,
}

/// Review service connection settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_API_URL.to_string(),
            auth_token: None,
        }
    }
}

/// Chat conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Prior messages sent as context per turn, capped at the wire
    /// contract's bound of six.
    pub context_window: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_window: CONTEXT_WINDOW,
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, then local config in `working_dir`,
    /// then applies environment variable overrides.
    pub fn load(working_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        if let Some(dir) = working_dir {
            let local_path = dir.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for
    /// non-default values).
    fn merge(&mut self, other: Config) {
        let default_api = ApiConfig::default();
        if other.api.base_url != default_api.base_url {
            self.api.base_url = other.api.base_url;
        }
        if other.api.auth_token.is_some() {
            self.api.auth_token = other.api.auth_token;
        }

        if other.chat.context_window != ChatConfig::default().context_window {
            self.chat.context_window = other.chat.context_window;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(url) = env.api_url() {
            self.api.base_url = url;
        }
        if let Some(token) = env.api_token() {
            self.api.auth_token = Some(token);
        }
        if let Some(raw) = env.chat_window() {
            if let Ok(window) = raw.parse::<usize>() {
                self.chat.context_window = window.min(CONTEXT_WINDOW);
            } else {
                eprintln!(
                    "Warning: ignoring invalid {} value: {raw}",
                    constants::ENV_CHAT_WINDOW
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, constants::DEFAULT_API_URL);
        assert!(config.api.auth_token.is_none());
        assert_eq!(config.chat.context_window, CONTEXT_WINDOW);
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[api]
base_url = "https://review.example"
auth_token = "tok-123"

[chat]
context_window = 4
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "https://review.example");
        assert_eq!(config.api.auth_token, Some("tok-123".to_string()));
        assert_eq!(config.chat.context_window, 4);
    }

    #[test]
    fn merge_overrides_non_default_values() {
        let mut base = Config::default();
        let mut other = Config::default();
        other.api.base_url = "https://other.example".to_string();
        other.api.auth_token = Some("tok".to_string());
        other.chat.context_window = 3;

        base.merge(other);

        assert_eq!(base.api.base_url, "https://other.example");
        assert_eq!(base.api.auth_token, Some("tok".to_string()));
        assert_eq!(base.chat.context_window, 3);
    }

    #[test]
    fn merge_keeps_base_when_other_is_default() {
        let mut base = Config::default();
        base.api.base_url = "https://kept.example".to_string();
        base.api.auth_token = Some("kept".to_string());

        base.merge(Config::default());

        assert_eq!(base.api.base_url, "https://kept.example");
        assert_eq!(base.api.auth_token, Some("kept".to_string()));
    }

    #[test]
    fn load_from_working_dir() {
        let env = Env::mock(Vec::<(&str, &str)>::new());
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(constants::CONFIG_FILENAME),
            r#"
[api]
base_url = "https://local.example"
"#,
        )
        .unwrap();

        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.api.base_url, "https://local.example");
    }

    #[test]
    fn load_without_any_config_files() {
        let env = Env::mock(Vec::<(&str, &str)>::new());
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.api.base_url, constants::DEFAULT_API_URL);
    }

    #[test]
    fn load_file_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid {{ toml").unwrap();

        let result = Config::load_file(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parse"));
    }

    #[test]
    fn env_vars_override_file_values() {
        let env = Env::mock([
            (constants::ENV_API_URL, "https://env.example"),
            (constants::ENV_API_TOKEN, "tok-env"),
        ]);
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(constants::CONFIG_FILENAME),
            r#"
[api]
base_url = "https://file.example"
auth_token = "tok-file"
"#,
        )
        .unwrap();

        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.api.base_url, "https://env.example");
        assert_eq!(config.api.auth_token, Some("tok-env".to_string()));
    }

    #[test]
    fn chat_window_env_is_parsed_and_capped() {
        let env = Env::mock([(constants::ENV_CHAT_WINDOW, "3")]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.chat.context_window, 3);

        let env = Env::mock([(constants::ENV_CHAT_WINDOW, "99")]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.chat.context_window, CONTEXT_WINDOW);

        let env = Env::mock([(constants::ENV_CHAT_WINDOW, "lots")]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.chat.context_window, CONTEXT_WINDOW);
    }
}
