//! Install-version command implementation.

use super::helpers::{load_config, open_chat, open_releases, open_session, operator_name};
use crate::cli::{Args, RuntimeConfig};
use crate::config::EnvConfig;
use crate::deploy::Deployer;
use crate::error::Result;
use crate::state::DeployContext;
use crate::version::resolve_asset;

/// Resolve `version` and unpack it into `<home>/releases/<version>`
pub(super) async fn execute_install_version(
    args: &Args,
    config: &RuntimeConfig,
    version: &str,
) -> Result<i32> {
    let deploy_config = load_config(args)?;
    let env = EnvConfig::from_env();
    let token = env.github_token()?;

    let releases = open_releases(&deploy_config, &token)?;
    let selected = resolve_asset(&releases, version, &deploy_config.platform).await?;
    let _ = config
        .output()
        .status(&format!("Found asset url: {}", selected.asset_url));

    let session = open_session(&deploy_config, config)?;
    let chat = open_chat(&deploy_config, &env, config.output());
    let deployer = Deployer::new(
        &deploy_config,
        &session,
        &chat,
        config.output(),
        &token,
        operator_name(&env),
    );

    let ctx = DeployContext::new(&deploy_config.user, &deploy_config.host, session.home());
    let install_dir = ctx.install_dir(&selected.version);
    deployer.install(&selected, &install_dir).await?;

    let _ = config
        .output()
        .success(&format!("Installed {} into {}", selected.version, install_dir));
    Ok(0)
}
