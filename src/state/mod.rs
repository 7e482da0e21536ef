//! State tracking for deploy operations.
//!
//! Nothing here is persisted; a context lives for one invocation.

mod deploy_state;

pub use deploy_state::{DeployContext, DeployPhase, SelectedVersion};
