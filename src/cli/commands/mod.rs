//! Command execution functions, one per deploy task.

mod chat;
mod choose_version;
mod deploy;
mod helpers;
mod install;
mod server;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

use chat::execute_chat;
use choose_version::execute_choose_version;
use deploy::execute_deploy;
use install::execute_install_version;
use server::{execute_start_server, execute_stop_server};

/// Execute the task named by the parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    // Validate arguments
    if let Err(e) = args.validate() {
        let output = super::OutputManager::new(false, false);
        output.error(&e.to_string());
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);

    let result = match &args.command {
        Command::Deploy => execute_deploy(&args, &config).await,
        Command::ChooseVersion => execute_choose_version(&args, &config).await,
        Command::InstallVersion { version } => {
            execute_install_version(&args, &config, version).await
        }
        Command::StopServer => execute_stop_server(&args, &config).await,
        Command::StartServer => execute_start_server(&args, &config).await,
        Command::Chat { message } => execute_chat(&args, &config, message).await,
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) if e.is_resolution_failure() => {
            // nothing touched the target; report and stop
            config.output().error(&e.to_string());
            Ok(1)
        }
        Err(e) => {
            config
                .output()
                .error(&format!("Task '{}' failed: {}", args.command.name(), e));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = config.output().println("\nRecovery suggestions:");
                for suggestion in suggestions {
                    let _ = config.output().println(&format!("  • {}", suggestion));
                }
            }
            Ok(1)
        }
    }
}
