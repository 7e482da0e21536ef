//! Secrets and switches read from the process environment.

use crate::error::{ConfigError, Result};
use std::collections::HashMap;

/// Environment variables consulted for the GitHub token, in order
const GITHUB_TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Environment variable holding the chat token
const SLACK_TOKEN_VAR: &str = "SLACK_TOKEN";

/// Snapshot of the environment variables the deploy cares about
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Capture the current process environment
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build from explicit pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Non-empty value of a variable
    pub fn get(&self, name: &str) -> Option<String> {
        self.vars
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    /// GitHub token, required for release lookup and artifact download
    pub fn github_token(&self) -> Result<String> {
        GITHUB_TOKEN_VARS
            .iter()
            .find_map(|name| self.get(name))
            .ok_or_else(|| {
                ConfigError::MissingEnv {
                    name: GITHUB_TOKEN_VARS[0].to_string(),
                }
                .into()
            })
    }

    /// Chat token; notifications are skipped without one
    pub fn slack_token(&self) -> Option<String> {
        self.get(SLACK_TOKEN_VAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_token_fallback() {
        let env = EnvConfig::from_pairs([("GH_TOKEN", "abc")]);
        assert_eq!(env.github_token().ok(), Some("abc".to_string()));

        let env = EnvConfig::from_pairs([("GITHUB_TOKEN", "first"), ("GH_TOKEN", "second")]);
        assert_eq!(env.github_token().ok(), Some("first".to_string()));
    }

    #[test]
    fn test_blank_values_are_missing() {
        let env = EnvConfig::from_pairs([("GITHUB_TOKEN", "  "), ("SLACK_TOKEN", "")]);
        assert!(env.github_token().is_err());
        assert_eq!(env.slack_token(), None);
    }
}
