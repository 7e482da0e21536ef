//! Command line argument parsing and validation.
//!
//! Each subcommand is one deploy task; the target comes from the config
//! file, optionally overridden with `--host` / `--user`.

use crate::error::{CliError, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Release-driven service deploys over SSH
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_deploy",
    version,
    about = "Deploy a GitHub release to a supervisor-managed service over SSH",
    long_about = "Deploy a GitHub release to a supervisor-managed service over SSH.

Usage:
  kodegen_deploy deploy
  kodegen_deploy --debug deploy
  kodegen_deploy --host app2.example.com stop-server
  kodegen_deploy chat \"maintenance in 5 minutes\""
)]
pub struct Args {
    /// Deploy config file (defaults to ./deploy.toml)
    #[arg(short, long, global = true, env = "KODEGEN_DEPLOY_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the target host
    #[arg(long, global = true, value_name = "HOST")]
    pub host: Option<String>,

    /// Override the deploy user
    #[arg(long, global = true, value_name = "USER")]
    pub user: Option<String>,

    /// Repository whose tags list the deployable versions
    #[arg(long, global = true, default_value = ".", value_name = "PATH")]
    pub repo: PathBuf,

    /// Show remote commands and their output
    #[arg(short, long, global = true, env = "DEPLOY_DEBUG")]
    pub debug: bool,

    /// Task to run
    #[command(subcommand)]
    pub command: Command,
}

/// Deploy tasks
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Choose a version, confirm, and roll it out
    Deploy,
    /// List recent tags and resolve the chosen one to a release asset
    ChooseVersion,
    /// Download and unpack a version into the releases directory
    InstallVersion {
        /// Version tag to install
        version: String,
    },
    /// Stop the service via supervisor
    StopServer,
    /// Start the service via supervisor
    StartServer,
    /// Post a message to the deploy chat channel
    Chat {
        /// Message text
        message: String,
    },
}

impl Command {
    /// Task name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::Deploy => "deploy",
            Command::ChooseVersion => "choose-version",
            Command::InstallVersion { .. } => "install-version",
            Command::StopServer => "stop-server",
            Command::StartServer => "start-server",
            Command::Chat { .. } => "chat",
        }
    }

    /// Whether the task talks to the GitHub API
    pub fn needs_github(&self) -> bool {
        matches!(
            self,
            Command::Deploy | Command::ChooseVersion | Command::InstallVersion { .. }
        )
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(host) = &self.host
            && host.trim().is_empty()
        {
            return Err(invalid("--host must not be empty"));
        }
        match &self.command {
            Command::InstallVersion { version } if version.trim().is_empty() => {
                Err(invalid("version must not be empty"))
            }
            Command::Chat { message } if message.trim().is_empty() => {
                Err(invalid("message must not be empty"))
            }
            _ => Ok(()),
        }
    }
}

fn invalid(reason: &str) -> crate::error::DeployError {
    CliError::InvalidArguments {
        reason: reason.to_string(),
    }
    .into()
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
    /// Debug mode: remote output is shown
    debug: bool,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(debug: bool) -> Self {
        Self {
            output: super::OutputManager::new(debug, false),
            debug,
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Whether debug output is enabled
    pub fn is_debug(&self) -> bool {
        self.debug
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_install_version() {
        let args = Args::try_parse_from(["kodegen_deploy", "--debug", "install-version", "v1.2.0"])
            .expect("parses");
        assert!(args.debug);
        assert_eq!(
            args.command,
            Command::InstallVersion {
                version: "v1.2.0".to_string()
            }
        );
        assert!(args.command.needs_github());
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let args = Args::try_parse_from(["kodegen_deploy", "stop-server", "--host", "app2"])
            .expect("parses");
        assert_eq!(args.host.as_deref(), Some("app2"));
        assert_eq!(args.command.name(), "stop-server");
        assert!(!args.command.needs_github());
    }

    #[test]
    fn test_blank_chat_message_rejected() {
        let args = Args::try_parse_from(["kodegen_deploy", "chat", " "]).expect("parses");
        assert!(matches!(
            args.validate(),
            Err(crate::error::DeployError::Cli(CliError::InvalidArguments { .. }))
        ));
    }
}
