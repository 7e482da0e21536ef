//! Chat command implementation.

use super::helpers::{load_config, open_chat};
use crate::cli::{Args, RuntimeConfig};
use crate::config::EnvConfig;
use crate::error::Result;

/// Post a message; delivery problems are reported but never fail the task
pub(super) async fn execute_chat(args: &Args, config: &RuntimeConfig, message: &str) -> Result<i32> {
    let deploy_config = load_config(args)?;
    let env = EnvConfig::from_env();
    let chat = open_chat(&deploy_config, &env, config.output());

    if chat.say(message).await {
        let _ = config.output().success("Message posted");
    }
    Ok(0)
}
