//! Shared helper functions for command execution.

use crate::cli::{Args, OutputManager, RuntimeConfig};
use crate::config::{DeployConfig, EnvConfig};
use crate::error::Result;
use crate::github::{GitHubReleaseConfig, GitHubReleaseManager};
use crate::notify::{Chat, SlackNotifier};
use crate::remote::{RemoteSession, SshExecutor};

/// Load the config file and apply command line overrides
pub(super) fn load_config(args: &Args) -> Result<DeployConfig> {
    DeployConfig::load(args.config.as_deref())?
        .with_overrides(args.host.as_deref(), args.user.as_deref())
}

/// SSH session for the configured deploy user
pub(super) fn open_session(
    config: &DeployConfig,
    runtime: &RuntimeConfig,
) -> Result<RemoteSession<SshExecutor>> {
    let executor = SshExecutor::new(config)?;
    Ok(RemoteSession::new(
        executor,
        &config.user,
        config.home_dir(),
        runtime.is_debug(),
        runtime.output().clone(),
    ))
}

/// Best-effort chat channel; warns once up front when no token is set
pub(super) fn open_chat(
    config: &DeployConfig,
    env: &EnvConfig,
    output: &OutputManager,
) -> Chat<SlackNotifier> {
    let token = env.slack_token();
    if token.is_none() {
        let _ = output.pending("SLACK_TOKEN not set, chat notifications will be skipped");
    }
    Chat::new(SlackNotifier::new(token, config.chat.clone()), output.clone())
}

/// Releases client for the configured repository
pub(super) fn open_releases(config: &DeployConfig, token: &str) -> Result<GitHubReleaseManager> {
    GitHubReleaseManager::new(GitHubReleaseConfig {
        owner: config.gh_account.clone(),
        repo: config.gh_repo.clone(),
        token: token.to_string(),
    })
}

/// Name of the local operator, used in chat messages
pub(super) fn operator_name(env: &EnvConfig) -> String {
    login_name()
        .or_else(|| env.get("USER"))
        .or_else(|| env.get("USERNAME"))
        .unwrap_or_else(|| "someone".to_string())
}

#[cfg(unix)]
fn login_name() -> Option<String> {
    users::get_current_username().map(|name| name.to_string_lossy().into_owned())
}

#[cfg(not(unix))]
fn login_name() -> Option<String> {
    None
}
