//! GitHub integration for release lookup

mod release_manager;

pub use release_manager::{
    GitHubReleaseConfig, GitHubReleaseManager, Release, ReleaseAsset, ReleaseLookup, find_asset,
};
