//! Git tag listing for version selection.
//!
//! Tags are read with the gix library directly, no git CLI required.

mod git_adapter;
mod operations;

pub use git_adapter::GixTagSource;
pub use operations::{ReleaseTag, TagSource, sort_by_authored};
