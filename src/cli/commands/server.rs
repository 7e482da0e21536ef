//! Stop-server and start-server command implementations.

use super::helpers::{load_config, open_chat, open_session, operator_name};
use crate::cli::{Args, RuntimeConfig};
use crate::config::EnvConfig;
use crate::deploy::Deployer;
use crate::error::Result;

/// Stop the service and kill stragglers
pub(super) async fn execute_stop_server(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let deploy_config = load_config(args)?;
    let env = EnvConfig::from_env();
    let session = open_session(&deploy_config, config)?;
    let chat = open_chat(&deploy_config, &env, config.output());

    Deployer::new(&deploy_config, &session, &chat, config.output(), "", operator_name(&env))
        .stop_server()
        .await?;
    let _ = config
        .output()
        .success(&format!("Stopped services for {}", deploy_config.target()));
    Ok(0)
}

/// Start the service
pub(super) async fn execute_start_server(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let deploy_config = load_config(args)?;
    let env = EnvConfig::from_env();
    let session = open_session(&deploy_config, config)?;
    let chat = open_chat(&deploy_config, &env, config.output());

    Deployer::new(&deploy_config, &session, &chat, config.output(), "", operator_name(&env))
        .start_server()
        .await?;
    let _ = config
        .output()
        .success(&format!("Started services for {}", deploy_config.target()));
    Ok(0)
}
