//! Transport for remote commands.

use crate::config::DeployConfig;
use crate::error::{RemoteError, Result};
use crate::remote::Invocation;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

/// Captured result of a remote command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteOutput {
    /// Whether the command exited zero
    pub success: bool,
    /// Exit status description
    pub status: String,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl RemoteOutput {
    /// A successful result carrying `stdout`
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            status: "exit status: 0".to_string(),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed result carrying `stderr`
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            status: format!("exit status: {}", code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Trait implemented by anything able to run an invocation on the target.
///
/// Implementations report non-zero exits through [`RemoteOutput::success`];
/// an `Err` means the command could not be run at all.
pub trait RemoteExecutor {
    /// Run `invocation` and capture its output
    fn execute(&self, invocation: &Invocation) -> impl Future<Output = Result<RemoteOutput>>;
}

/// Runs invocations through the system ssh client with agent forwarding
#[derive(Debug, Clone)]
pub struct SshExecutor {
    ssh: PathBuf,
    destination: String,
    port: Option<u16>,
    identity_file: Option<PathBuf>,
}

impl SshExecutor {
    /// Build an executor for the configured target
    pub fn new(config: &DeployConfig) -> Result<Self> {
        let ssh = which::which("ssh").map_err(|_| RemoteError::SshNotFound)?;
        Ok(Self {
            ssh,
            destination: format!("{}@{}", config.login_user, config.host),
            port: config.ssh_port,
            identity_file: config.identity_file.clone(),
        })
    }

    /// Arguments passed to ssh for `remote_command`
    pub fn ssh_args(&self, remote_command: &str) -> Vec<String> {
        let mut args = vec![
            "-A".to_string(),
            "-o".to_string(),
            "BatchMode=yes".to_string(),
        ];
        if let Some(port) = self.port {
            args.push("-p".to_string());
            args.push(port.to_string());
        }
        if let Some(identity) = &self.identity_file {
            args.push("-i".to_string());
            args.push(identity.display().to_string());
        }
        args.push(self.destination.clone());
        args.push("--".to_string());
        args.push(remote_command.to_string());
        args
    }
}

impl RemoteExecutor for SshExecutor {
    async fn execute(&self, invocation: &Invocation) -> Result<RemoteOutput> {
        let rendered = invocation.render();
        let output = tokio::process::Command::new(&self.ssh)
            .args(self.ssh_args(&rendered))
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(RemoteOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
