//! Deploy command implementation.
//!
//! Preconditions (config, GitHub token, ssh client, tag repository) are
//! checked before anything is shown to the operator.

use super::helpers::{load_config, open_chat, open_releases, open_session, operator_name};
use crate::cli::{Args, RuntimeConfig, StdinPrompter};
use crate::config::EnvConfig;
use crate::deploy::{DeployOutcome, Deployer};
use crate::error::Result;
use crate::git::GixTagSource;
use crate::version::VersionSelector;

/// Execute deploy command
pub(super) async fn execute_deploy(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let deploy_config = load_config(args)?;
    let env = EnvConfig::from_env();
    let token = env.github_token()?;

    let tags = GixTagSource::discover(&args.repo)?;
    let releases = open_releases(&deploy_config, &token)?;
    let session = open_session(&deploy_config, config)?;
    let chat = open_chat(&deploy_config, &env, config.output());
    let prompter = StdinPrompter::new(config.output().clone());

    let selector = VersionSelector::new(
        &tags,
        &releases,
        &prompter,
        config.output(),
        &deploy_config.platform,
        deploy_config.tag_limit,
    );
    let deployer = Deployer::new(
        &deploy_config,
        &session,
        &chat,
        config.output(),
        &token,
        operator_name(&env),
    );

    match deployer.deploy(&selector, &prompter).await? {
        DeployOutcome::Completed(ctx) => {
            let _ = config.output().success(&format!(
                "Deployed {} in {}s",
                ctx.version.as_deref().unwrap_or_default(),
                ctx.elapsed().num_seconds()
            ));
            Ok(0)
        }
        DeployOutcome::Cancelled => Ok(0),
    }
}
