//! Command line interface for kodegen_deploy.
//!
//! This module provides the CLI for deploy tasks, with argument parsing,
//! command execution, prompts and user feedback.

mod args;
pub mod commands;
mod output;
mod prompt;

pub use args::{Args, Command, RuntimeConfig};
pub use commands::execute_command;
pub use output::OutputManager;
pub use prompt::{Prompter, StdinPrompter, resolve_confirm, resolve_input};

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    init_logging(args.debug);
    execute_command(args).await
}

/// Configure env_logger; `--debug` lowers the default filter to `debug`
pub fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}
