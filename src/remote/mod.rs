//! Remote command execution on the deploy target.
//!
//! - `command` - typed, shell-quoted command building
//! - `executor` - transport (system ssh with agent forwarding)
//! - `session` - identity hand-off and warn-only policy

mod command;
mod executor;
mod session;

pub use command::{Invocation, Privilege, RemoteCommand, quote};
pub use executor::{RemoteExecutor, RemoteOutput, SshExecutor};
pub use session::{RemoteSession, agent_socket_dir};
