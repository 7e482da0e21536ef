//! Version selection for deploys.
//!
//! Offers the most recent release tags, asks the operator to pick one and
//! resolves it to the platform asset of the matching GitHub release.

mod selector;

pub use selector::{Selection, VersionSelector, is_prerelease, recent_tags, resolve_asset};
