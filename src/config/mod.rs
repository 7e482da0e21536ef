//! Deploy target configuration.
//!
//! The target is described by a TOML file; secrets never live there and are
//! read from the environment through [`EnvConfig`].

mod env;

pub use env::EnvConfig;

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file name searched in the working directory
pub const CONFIG_FILE_NAME: &str = "deploy.toml";

/// Description of one deploy target
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    /// Target host name or address
    pub host: String,
    /// Unprivileged deploy user owning the service
    pub user: String,
    /// Account used for the SSH login (must be able to sudo)
    #[serde(default = "default_login_user")]
    pub login_user: String,
    /// SSH port
    #[serde(default)]
    pub ssh_port: Option<u16>,
    /// Private key passed to ssh with `-i`
    #[serde(default)]
    pub identity_file: Option<PathBuf>,
    /// GitHub account owning the repository
    pub gh_account: String,
    /// GitHub repository holding the releases
    pub gh_repo: String,
    /// Substring identifying the asset built for the target
    #[serde(default = "default_platform")]
    pub platform: String,
    /// File name the artifact is downloaded to inside the release dir
    #[serde(default = "default_artifact_file")]
    pub artifact_file: String,
    /// How many recent tags to offer
    #[serde(default = "default_tag_limit")]
    pub tag_limit: usize,
    /// Supervised sub-processes, addressed as `<user>_<process>`
    #[serde(default)]
    pub processes: Option<Vec<String>>,
    /// Whether a `<user>_celery` worker runs next to the main process
    #[serde(default)]
    pub celery: bool,
    /// Process names force-killed as the deploy user after stopping
    #[serde(default = "default_kill_processes")]
    pub kill_processes: Vec<String>,
    /// Chat notification settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Chat notification settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Channel messages are posted to
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Display name of the poster
    #[serde(default = "default_username")]
    pub username: String,
    /// Avatar shown next to messages
    #[serde(default)]
    pub icon_url: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            username: default_username(),
            icon_url: None,
        }
    }
}

fn default_login_user() -> String {
    "ubuntu".to_string()
}

fn default_platform() -> String {
    "linux_amd64".to_string()
}

fn default_artifact_file() -> String {
    "release.tar.gz".to_string()
}

fn default_tag_limit() -> usize {
    10
}

fn default_kill_processes() -> Vec<String> {
    vec!["python".to_string(), "celery".to_string()]
}

fn default_channel() -> String {
    "#code".to_string()
}

fn default_username() -> String {
    "deploy".to_string()
}

impl DeployConfig {
    /// Parse and validate a config from TOML text
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        let config: DeployConfig = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config from an explicit path, or search the default locations
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let candidates = match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => Self::default_locations(),
        };

        let path = candidates
            .iter()
            .find(|p| p.is_file())
            .ok_or_else(|| ConfigError::NotFound {
                searched: candidates.clone(),
            })?;

        log::debug!("Loading deploy config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text, path)
    }

    /// `./deploy.toml`, then `<config dir>/kodegen/deploy.toml`
    pub fn default_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            locations.push(dir.join("kodegen").join(CONFIG_FILE_NAME));
        }
        locations
    }

    /// Apply `--host` / `--user` overrides from the command line
    pub fn with_overrides(mut self, host: Option<&str>, user: Option<&str>) -> Result<Self> {
        if let Some(host) = host {
            self.host = host.to_string();
        }
        if let Some(user) = user {
            self.user = user.to_string();
        }
        self.validate()?;
        Ok(self)
    }

    /// Home directory of the deploy user on the target
    pub fn home_dir(&self) -> String {
        format!("/home/{}", self.user)
    }

    /// `user@host`, as shown in prompts and notifications
    pub fn target(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("host", &self.host),
            ("gh_account", &self.gh_account),
            ("gh_repo", &self.gh_repo),
            ("platform", &self.platform),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        // user and process names end up inside supervisor program names
        if !is_identifier(&self.user) {
            return Err(invalid(
                "user",
                "must be non-empty and contain only letters, digits, '_' or '-'",
            ));
        }
        if !is_identifier(&self.login_user) {
            return Err(invalid(
                "login_user",
                "must be non-empty and contain only letters, digits, '_' or '-'",
            ));
        }
        if let Some(processes) = &self.processes
            && let Some(bad) = processes.iter().find(|p| !is_identifier(p))
        {
            return Err(invalid("processes", &format!("'{}' is not a valid name", bad)));
        }
        if self.artifact_file.contains('/') || self.artifact_file.is_empty() {
            return Err(invalid("artifact_file", "must be a plain file name"));
        }
        if self.tag_limit == 0 {
            return Err(invalid("tag_limit", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> crate::error::DeployError {
    ConfigError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

fn is_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
host = "app1.example.com"
user = "textit"
gh_account = "acme"
gh_repo = "flowserver"
"#;

    fn parse(text: &str) -> Result<DeployConfig> {
        DeployConfig::from_toml(text, Path::new("deploy.toml"))
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = parse(MINIMAL).expect("minimal config parses");
        assert_eq!(config.login_user, "ubuntu");
        assert_eq!(config.platform, "linux_amd64");
        assert_eq!(config.tag_limit, 10);
        assert_eq!(config.processes, None);
        assert!(!config.celery);
        assert_eq!(config.kill_processes, vec!["python", "celery"]);
        assert_eq!(config.chat.channel, "#code");
        assert_eq!(config.home_dir(), "/home/textit");
        assert_eq!(config.target(), "textit@app1.example.com");
    }

    #[test]
    fn test_processes_list() {
        let text = format!("{}processes = [\"web\", \"worker\"]\n", MINIMAL);
        let config = parse(&text).expect("config parses");
        assert_eq!(
            config.processes,
            Some(vec!["web".to_string(), "worker".to_string()])
        );
    }

    #[test]
    fn test_rejects_shell_metacharacters_in_user() {
        let text = MINIMAL.replace("\"textit\"", "\"textit; rm -rf /\"");
        assert!(matches!(
            parse(&text),
            Err(crate::error::DeployError::Config(ConfigError::InvalidField { .. }))
        ));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let text = format!("{}colour = \"blue\"\n", MINIMAL);
        assert!(matches!(
            parse(&text),
            Err(crate::error::DeployError::Config(ConfigError::Parse { .. }))
        ));
    }

    #[test]
    fn test_overrides_are_validated() {
        let config = parse(MINIMAL).expect("config parses");
        let config = config
            .with_overrides(Some("app2.example.com"), Some("rapidpro"))
            .expect("valid override");
        assert_eq!(config.target(), "rapidpro@app2.example.com");
        assert!(config.with_overrides(None, Some("")).is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = DeployConfig::load(Some(Path::new("/nonexistent/deploy.toml")));
        assert!(matches!(
            result,
            Err(crate::error::DeployError::Config(ConfigError::NotFound { .. }))
        ));
    }
}
