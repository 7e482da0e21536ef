//! GitHub release lookup for resolving a version to a downloadable asset

use crate::error::{GitHubError, Result};
use serde::Deserialize;
use std::future::Future;
use url::Url;

/// GitHub REST API root
const API_ROOT: &str = "https://api.github.com";

/// Releases requested per page (GitHub maximum)
const PER_PAGE: u32 = 100;

/// A GitHub release. Does not contain all fields.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Display name; may be null for releases created from a bare tag
    #[serde(default)]
    pub name: Option<String>,
    /// Tag the release was cut from
    pub tag_name: String,
    /// Attached build artifacts
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A release's asset. Does not contain all fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    /// File name, e.g. `flowserver_1.4.2_linux_amd64.tar.gz`
    pub name: String,
    /// API URL; serves the binary when fetched with `Accept: application/octet-stream`
    pub url: Url,
}

impl Release {
    /// Whether this release is the one published for `version`
    pub fn matches_version(&self, version: &str) -> bool {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name == version,
            _ => self.tag_name == version,
        }
    }

    /// First asset whose name mentions `platform`
    pub fn platform_asset(&self, platform: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|asset| asset.name.contains(platform))
    }
}

/// Locate the asset for `version` built for `platform`.
///
/// Every release matching the version is scanned in order; the first one
/// carrying a platform asset wins.
pub fn find_asset<'a>(
    releases: &'a [Release],
    version: &str,
    platform: &str,
) -> Option<&'a ReleaseAsset> {
    releases
        .iter()
        .filter(|release| release.matches_version(version))
        .find_map(|release| release.platform_asset(platform))
}

/// Source of published releases
pub trait ReleaseLookup {
    /// List the repository's releases, newest first
    fn list_releases(&self) -> impl Future<Output = Result<Vec<Release>>>;
}

/// Configuration for the GitHub releases client
#[derive(Debug, Clone)]
pub struct GitHubReleaseConfig {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// GitHub token
    pub token: String,
}

/// Reads releases from the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubReleaseManager {
    client: reqwest::Client,
    config: GitHubReleaseConfig,
}

impl GitHubReleaseManager {
    /// Create a new client
    pub fn new(config: GitHubReleaseConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GitHubError::Http)?;
        Ok(Self { client, config })
    }

    /// `GET /repos/{owner}/{repo}/releases` URL
    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases?per_page={}",
            API_ROOT, self.config.owner, self.config.repo, PER_PAGE
        )
    }
}

impl ReleaseLookup for GitHubReleaseManager {
    async fn list_releases(&self) -> Result<Vec<Release>> {
        let url = self.releases_url();
        log::debug!("Fetching releases from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("token {}", self.config.token))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(GitHubError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GitHubError::Status {
                status: status.as_u16(),
                url,
            }
            .into());
        }

        let releases: Vec<Release> = response.json().await.map_err(GitHubError::Http)?;
        log::debug!("Received {} release(s)", releases.len());
        Ok(releases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn releases() -> Vec<Release> {
        serde_json::from_str(
            r#"[
                {
                    "name": "v1.1.0",
                    "tag_name": "v1.1.0",
                    "assets": [
                        {"name": "flowserver_1.1.0_darwin_amd64.tar.gz",
                         "url": "https://api.github.com/repos/acme/flowserver/releases/assets/10"},
                        {"name": "flowserver_1.1.0_linux_amd64.tar.gz",
                         "url": "https://api.github.com/repos/acme/flowserver/releases/assets/11"}
                    ]
                },
                {
                    "name": null,
                    "tag_name": "v1.0.0",
                    "assets": [
                        {"name": "flowserver_1.0.0_linux_amd64.tar.gz",
                         "url": "https://api.github.com/repos/acme/flowserver/releases/assets/5"}
                    ]
                },
                {
                    "name": "v0.9.0",
                    "tag_name": "v0.9.0",
                    "assets": []
                }
            ]"#,
        )
        .expect("fixture parses")
    }

    #[test]
    fn test_finds_platform_asset() {
        let releases = releases();
        let asset = find_asset(&releases, "v1.1.0", "linux_amd64").expect("asset");
        assert_eq!(asset.url.path(), "/repos/acme/flowserver/releases/assets/11");
    }

    #[test]
    fn test_null_name_falls_back_to_tag() {
        let releases = releases();
        let asset = find_asset(&releases, "v1.0.0", "linux_amd64").expect("asset");
        assert_eq!(asset.name, "flowserver_1.0.0_linux_amd64.tar.gz");
    }

    #[test]
    fn test_no_matching_release() {
        let releases = releases();
        assert!(find_asset(&releases, "v2.0.0", "linux_amd64").is_none());
    }

    #[test]
    fn test_release_without_platform_asset() {
        let releases = releases();
        assert!(find_asset(&releases, "v0.9.0", "linux_amd64").is_none());
        assert!(find_asset(&releases, "v1.0.0", "linux_arm64").is_none());
    }

    #[test]
    fn test_releases_url() {
        let manager = GitHubReleaseManager::new(GitHubReleaseConfig {
            owner: "acme".to_string(),
            repo: "flowserver".to_string(),
            token: "t".to_string(),
        })
        .expect("client builds");
        assert_eq!(
            manager.releases_url(),
            "https://api.github.com/repos/acme/flowserver/releases?per_page=100"
        );
    }
}
