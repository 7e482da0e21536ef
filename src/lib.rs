//! # kodegen_deploy
//!
//! Ships a tagged release of a service to a single host over SSH.
//!
//! A deploy picks a version from the repository's recent tags, resolves the
//! matching GitHub release asset, asks the operator to confirm, then unpacks
//! the asset into `<home>/releases/<version>` as the deploy user, stops the
//! supervisor programs, repoints `<home>/live` and starts them again. Chat
//! notifications bracket the run on a best-effort basis.
//!
//! ## Usage
//!
//! ```bash
//! kodegen_deploy deploy                  # interactive deploy
//! kodegen_deploy --host app2 deploy      # same, against another host
//! kodegen_deploy install-version v1.4.2  # unpack only, no restart
//! kodegen_deploy stop-server
//! kodegen_deploy chat "deploying after lunch"
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod cli;
pub mod config;
pub mod deploy;
pub mod error;
pub mod git;
pub mod github;
pub mod notify;
pub mod remote;
pub mod state;
pub mod supervisor;
pub mod version;

// Re-export main types for public API
pub use cli::Args;
pub use config::{ChatConfig, DeployConfig, EnvConfig};
pub use deploy::{DeployOutcome, Deployer};
pub use error::{DeployError, Result};
pub use git::{GixTagSource, ReleaseTag, TagSource};
pub use github::{GitHubReleaseManager, ReleaseLookup};
pub use notify::{Chat, Notifier, SlackNotifier};
pub use remote::{Invocation, RemoteCommand, RemoteExecutor, RemoteSession, SshExecutor};
pub use state::{DeployContext, DeployPhase, SelectedVersion};
pub use version::{Selection, VersionSelector};
