//! Supervisor control for the deployed service.
//!
//! The primary program group is named after the deploy user. Sub-processes
//! are addressed as `<user>_<process>`; without a process list a single
//! `<user>_celery` worker may be configured instead.

use crate::config::DeployConfig;
use crate::error::Result;
use crate::notify::{Chat, Notifier};
use crate::remote::{Invocation, RemoteCommand, RemoteExecutor, RemoteSession};
use std::fmt;

/// Direction of a supervisor operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorAction {
    /// `supervisorctl start`
    Start,
    /// `supervisorctl stop`
    Stop,
}

impl fmt::Display for SupervisorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupervisorAction::Start => f.write_str("start"),
            SupervisorAction::Stop => f.write_str("stop"),
        }
    }
}

/// Programs acted on, primary first.
///
/// A configured process list (even an empty one) takes precedence over the
/// celery worker.
pub fn program_names(config: &DeployConfig) -> Vec<String> {
    let mut names = vec![config.user.clone()];
    match &config.processes {
        Some(processes) => {
            names.extend(processes.iter().map(|p| format!("{}_{}", config.user, p)));
        }
        None if config.celery => names.push(format!("{}_celery", config.user)),
        None => {}
    }
    names
}

/// `supervisorctl <action> <program>` for every program, in order
pub fn supervisor_commands(action: SupervisorAction, config: &DeployConfig) -> Vec<RemoteCommand> {
    program_names(config)
        .into_iter()
        .map(|program| {
            RemoteCommand::new("supervisorctl")
                .arg(action.to_string())
                .arg(program)
        })
        .collect()
}

/// Force-kill stragglers as the deploy user; failures are only warnings
pub fn kill_invocations(config: &DeployConfig) -> Vec<Invocation> {
    config
        .kill_processes
        .iter()
        .map(|name| {
            Invocation::user(&config.user, RemoteCommand::new("killall").args(["-9", name.as_str()]))
                .warn_only()
        })
        .collect()
}

/// Issues start/stop for the service on the target
pub struct ProcessController<'a, E, N> {
    config: &'a DeployConfig,
    session: &'a RemoteSession<E>,
    chat: &'a Chat<N>,
    output: &'a crate::cli::OutputManager,
}

impl<'a, E: RemoteExecutor, N: Notifier> ProcessController<'a, E, N> {
    /// Create a controller
    pub fn new(
        config: &'a DeployConfig,
        session: &'a RemoteSession<E>,
        chat: &'a Chat<N>,
        output: &'a crate::cli::OutputManager,
    ) -> Self {
        Self {
            config,
            session,
            chat,
            output,
        }
    }

    /// Stop every program, then kill leftover runtime processes
    pub async fn stop(&self) -> Result<()> {
        let _ = self.output.status("stopping services");
        self.chat
            .say(&format!("Bringing server down for {}", self.config.target()))
            .await;

        for command in supervisor_commands(SupervisorAction::Stop, self.config) {
            self.session.sudo(command).await?;
        }

        // supervisor may leave orphaned workers behind
        for invocation in kill_invocations(self.config) {
            self.session.run(invocation).await?;
        }
        Ok(())
    }

    /// Start every program
    pub async fn start(&self) -> Result<()> {
        self.chat
            .say(&format!("Bringing server up for {}", self.config.target()))
            .await;
        let _ = self.output.status("starting services");

        for command in supervisor_commands(SupervisorAction::Start, self.config) {
            self.session.sudo(command).await?;
        }
        Ok(())
    }
}
