//! Process environment access.
//!
//! Configuration reads a handful of `CODECRITIC_*` variables. This
//! wrapper exposes them as typed accessors and lets tests substitute a
//! fixed variable set instead of mutating the process environment with
//! `unsafe` [`std::env::set_var`] calls.

use std::collections::HashMap;

use crate::constants;

/// Environment variable reader with typed accessors for the variables
/// this crate cares about.
#[derive(Clone, Debug, Default)]
pub struct Env {
    vars: Option<HashMap<String, String>>,
}

impl Env {
    /// An `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { vars: None }
    }

    /// An `Env` backed by explicit key-value pairs.
    #[cfg(test)]
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            vars: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Review service base URL override.
    pub fn api_url(&self) -> Option<String> {
        self.non_empty(constants::ENV_API_URL)
    }

    /// Bearer token for the authenticated endpoints.
    pub fn api_token(&self) -> Option<String> {
        self.non_empty(constants::ENV_API_TOKEN)
    }

    /// Chat context-window override, unparsed. Validation happens at the
    /// config layer, where a bad value is reported next to the rest.
    pub fn chat_window(&self) -> Option<String> {
        self.non_empty(constants::ENV_CHAT_WINDOW)
    }

    /// A set-but-blank variable reads as unset.
    fn non_empty(&self, name: &str) -> Option<String> {
        let value = match &self.vars {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_env_exposes_typed_values() {
        let env = Env::mock([
            (constants::ENV_API_URL, "http://api.test"),
            (constants::ENV_CHAT_WINDOW, "3"),
        ]);
        assert_eq!(env.api_url().as_deref(), Some("http://api.test"));
        assert_eq!(env.chat_window().as_deref(), Some("3"));
        assert_eq!(env.api_token(), None);
    }

    #[test]
    fn blank_values_read_as_unset() {
        let env = Env::mock([(constants::ENV_API_TOKEN, "   ")]);
        assert_eq!(env.api_token(), None);
    }

    #[test]
    fn default_env_reads_the_process_environment() {
        // No CODECRITIC_* variables are set in the test environment, so
        // every accessor comes back empty rather than panicking.
        let env = Env::default();
        let _ = (env.api_url(), env.api_token(), env.chat_window());
    }
}
