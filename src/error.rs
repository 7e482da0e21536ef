//! Error types for kodegen_deploy operations.
//!
//! Every error carries an actionable message; `DeployError::recovery_suggestions`
//! turns the common failures into next steps for the operator.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for kodegen_deploy operations
pub type Result<T> = std::result::Result<T, DeployError>;

/// Main error type for all kodegen_deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Git tag listing errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Release lookup errors
    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    /// Remote execution errors
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No config file found at any of the searched locations
    #[error("No deploy config found (searched: {searched:?})")]
    NotFound {
        /// Paths that were tried
        searched: Vec<PathBuf>,
    },

    /// Config file could not be parsed
    #[error("Failed to parse {path}: {reason}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// A field holds an unusable value
    #[error("Invalid value for '{field}': {reason}")]
    InvalidField {
        /// Field name
        field: String,
        /// Reason for the error
        reason: String,
    },

    /// Required secret is missing from the environment
    #[error("Must have {name} environment variable set")]
    MissingEnv {
        /// Variable name
        name: String,
    },
}

/// Git tag listing errors
#[derive(Error, Debug)]
pub enum GitError {
    /// Not a git repository
    #[error("Not a git repository: {path}")]
    NotRepository {
        /// Path that was opened
        path: PathBuf,
    },

    /// Reading references or objects failed
    #[error("Failed to read tags: {reason}")]
    TagReadFailed {
        /// Reason for the error
        reason: String,
    },
}

/// Release lookup errors
#[derive(Error, Debug)]
pub enum GitHubError {
    /// No tags exist to choose from
    #[error("No versions to ship, tag a release before deploying")]
    NoVersions,

    /// No release (or no platform asset) matches the chosen version
    #[error("No release found for {version}")]
    ReleaseNotFound {
        /// Requested version
        version: String,
    },

    /// The releases endpoint returned an error status
    #[error("GitHub API returned {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Transport or decode failure
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Remote execution errors
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The ssh client is not installed
    #[error("ssh client not found in PATH")]
    SshNotFound,

    /// The remote command exited unsuccessfully
    #[error("Remote command failed ({status}): {command}\n{stderr}")]
    CommandFailed {
        /// Rendered command
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// `$SSH_AUTH_SOCK` was empty or not under /tmp
    #[error("Agent forwarding socket unavailable on remote host (got '{socket}')")]
    NoAgentSocket {
        /// Value read from the remote environment
        socket: String,
    },
}

/// Chat notification errors; logged, never propagated
#[derive(Error, Debug)]
pub enum ChatError {
    /// No chat token configured
    #[error("SLACK_TOKEN not set")]
    NoToken,

    /// Transport or decode failure
    #[error("chat request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The chat API rejected the message
    #[error("chat API error: {0}")]
    Api(String),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Prompt or console interaction failed
    #[error("Prompt failed: {reason}")]
    Prompt {
        /// Reason for the error
        reason: String,
    },
}

impl DeployError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            DeployError::Config(ConfigError::NotFound { .. }) => vec![
                "Create deploy.toml in the current directory".to_string(),
                "Or point at one with --config / KODEGEN_DEPLOY_CONFIG".to_string(),
            ],
            DeployError::Config(ConfigError::MissingEnv { name }) => vec![
                format!("Export {} before running the deploy", name),
            ],
            DeployError::Git(GitError::NotRepository { .. }) => vec![
                "Run from inside the repository whose tags you release".to_string(),
            ],
            DeployError::GitHub(GitHubError::NoVersions) => vec![
                "Create and push a version tag first: git tag -a v1.0.0 && git push --tags"
                    .to_string(),
            ],
            DeployError::GitHub(GitHubError::ReleaseNotFound { version }) => vec![
                format!("Check that a GitHub release named {} exists", version),
                "Verify the release has an asset built for the configured platform".to_string(),
            ],
            DeployError::GitHub(GitHubError::Status { status: 401, .. }) => vec![
                "Verify GITHUB_TOKEN is valid and can read the repository".to_string(),
            ],
            DeployError::Remote(RemoteError::SshNotFound) => vec![
                "Install an OpenSSH client".to_string(),
            ],
            DeployError::Remote(RemoteError::NoAgentSocket { .. }) => vec![
                "Start ssh-agent and add your key: ssh-add".to_string(),
                "Check that AllowAgentForwarding is enabled on the target".to_string(),
            ],
            DeployError::Remote(RemoteError::CommandFailed { .. }) => vec![
                "Re-run with --debug to see remote output".to_string(),
                "The service may be stopped; check supervisorctl status on the host".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Resolution failures leave the target untouched
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            DeployError::GitHub(GitHubError::NoVersions)
                | DeployError::GitHub(GitHubError::ReleaseNotFound { .. })
        )
    }
}
