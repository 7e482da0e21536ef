//! Remote session bound to one deploy user.
//!
//! Commands for the deploy user run through `sudo -u` after sourcing
//! `<home>/env.sh`. Before that works with forwarded keys, the login
//! account's agent socket directory must be handed to the deploy user
//! ([`RemoteSession::hijack_agent_socket`]).

use crate::cli::OutputManager;
use crate::error::{RemoteError, Result};
use crate::remote::{Invocation, RemoteCommand, RemoteExecutor, RemoteOutput};

/// Runs commands on the target as the deploy user, root, or the login account
#[derive(Debug)]
pub struct RemoteSession<E> {
    executor: E,
    user: String,
    home: String,
    debug: bool,
    output: OutputManager,
}

impl<E: RemoteExecutor> RemoteSession<E> {
    /// Create a session for `user` whose home is `home`
    pub fn new(
        executor: E,
        user: impl Into<String>,
        home: impl Into<String>,
        debug: bool,
        output: OutputManager,
    ) -> Self {
        Self {
            executor,
            user: user.into(),
            home: home.into(),
            debug,
            output,
        }
    }

    /// Deploy user
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Deploy user's home directory
    pub fn home(&self) -> &str {
        &self.home
    }

    /// Shell file sourced before every deploy-user command
    pub fn env_file(&self) -> String {
        format!("{}/env.sh", self.home)
    }

    /// Underlying executor
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run an invocation, applying the warn-only policy
    pub async fn run(&self, invocation: Invocation) -> Result<RemoteOutput> {
        let rendered = invocation.render_redacted();
        log::debug!("remote: {}", rendered);
        if self.debug {
            let _ = self.output.verbose(&format!("[run] {}", rendered));
        }

        let result = self.executor.execute(&invocation).await?;

        if self.debug {
            for line in result.stdout.lines().chain(result.stderr.lines()) {
                let _ = self.output.indent(line);
            }
        }

        if result.success {
            return Ok(result);
        }

        if invocation.is_warn_only() {
            log::warn!("{} ({}): {}", rendered, result.status, result.stderr.trim());
            let _ = self.output.warn(&format!(
                "Ignoring failure of '{}' ({})",
                invocation.command(),
                result.status
            ));
            return Ok(result);
        }

        Err(RemoteError::CommandFailed {
            command: rendered,
            status: result.status,
            stderr: result.stderr.trim().to_string(),
        }
        .into())
    }

    /// Run as the deploy user with its environment file sourced
    pub async fn run_user(&self, command: RemoteCommand) -> Result<RemoteOutput> {
        self.run(Invocation::user(&self.user, command).source(self.env_file()))
            .await
    }

    /// Like [`run_user`](Self::run_user), inside `dir`
    pub async fn run_user_in(&self, dir: &str, command: RemoteCommand) -> Result<RemoteOutput> {
        self.run(
            Invocation::user(&self.user, command)
                .source(self.env_file())
                .in_dir(dir),
        )
        .await
    }

    /// Run as root
    pub async fn sudo(&self, command: RemoteCommand) -> Result<RemoteOutput> {
        self.run(Invocation::root(command)).await
    }

    /// Hand the forwarded agent socket to the deploy user so forwarded keys
    /// stay usable after `sudo -u`.
    pub async fn hijack_agent_socket(&self) -> Result<String> {
        let probe =
            Invocation::login(RemoteCommand::new("printenv").arg("SSH_AUTH_SOCK")).warn_only();
        let result = self.run(probe).await?;
        let socket = result.stdout.trim().to_string();

        let dir = match agent_socket_dir(&socket) {
            Some(dir) if result.success => dir,
            _ => return Err(RemoteError::NoAgentSocket { socket }.into()),
        };

        self.sudo(
            RemoteCommand::new("chown")
                .arg("-R")
                .arg(format!("{0}:{0}", self.user))
                .arg(&dir),
        )
        .await?;
        log::debug!("agent socket {} now owned by {}", dir, self.user);
        Ok(dir)
    }
}

/// Top-level directory of an agent socket: `/tmp/ssh-abc/agent.1` → `/tmp/ssh-abc`
pub fn agent_socket_dir(socket: &str) -> Option<String> {
    let mut parts = socket.strip_prefix("/tmp/")?.split('/');
    let dir = parts.next()?;
    if dir.is_empty() || dir == "." || dir == ".." || parts.next().is_none() {
        return None;
    }
    Some(format!("/tmp/{}", dir))
}
