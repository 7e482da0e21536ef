//! Choose-version command implementation.
//!
//! Runs the interactive selection alone, without touching the target.

use super::helpers::{load_config, open_releases};
use crate::cli::{Args, RuntimeConfig, StdinPrompter};
use crate::config::EnvConfig;
use crate::error::Result;
use crate::git::GixTagSource;
use crate::version::{Selection, VersionSelector};

/// Execute choose-version command
pub(super) async fn execute_choose_version(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let deploy_config = load_config(args)?;
    let token = EnvConfig::from_env().github_token()?;

    let tags = GixTagSource::discover(&args.repo)?;
    let releases = open_releases(&deploy_config, &token)?;
    let prompter = StdinPrompter::new(config.output().clone());
    let selector = VersionSelector::new(
        &tags,
        &releases,
        &prompter,
        config.output(),
        &deploy_config.platform,
        deploy_config.tag_limit,
    );

    match selector.choose().await? {
        Selection::Chosen(selected) => {
            let _ = config
                .output()
                .success(&format!("{} is ready to deploy", selected.version));
            Ok(0)
        }
        Selection::Cancelled => Ok(0),
    }
}
