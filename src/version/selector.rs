//! Interactive version selector.

use crate::cli::{OutputManager, Prompter};
use crate::error::{GitHubError, Result};
use crate::git::{ReleaseTag, TagSource};
use crate::github::{ReleaseLookup, find_asset};
use crate::state::SelectedVersion;

/// Width of the rule printed under the table header
const RULE_WIDTH: usize = 100;

/// Outcome of an interactive selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A version with a resolved asset
    Chosen(SelectedVersion),
    /// The operator declined
    Cancelled,
}

/// The last `limit` tags, in source order (newest last)
pub fn recent_tags(tags: &[ReleaseTag], limit: usize) -> &[ReleaseTag] {
    &tags[tags.len().saturating_sub(limit)..]
}

/// Pre-release tags carry a `-` suffix (`v1.2.0-rc1`)
pub fn is_prerelease(version: &str) -> bool {
    version.contains('-')
}

/// Resolve `version` to its `platform` asset without any prompting
pub async fn resolve_asset<L: ReleaseLookup>(
    lookup: &L,
    version: &str,
    platform: &str,
) -> Result<SelectedVersion> {
    let releases = lookup.list_releases().await?;
    let asset = find_asset(&releases, version, platform).ok_or_else(|| {
        GitHubError::ReleaseNotFound {
            version: version.to_string(),
        }
    })?;

    log::debug!("{} resolved to asset {}", version, asset.name);
    Ok(SelectedVersion {
        version: version.to_string(),
        asset_url: asset.url.clone(),
    })
}

/// Walks the operator through picking a version
pub struct VersionSelector<'a, T, L, P> {
    tags: &'a T,
    lookup: &'a L,
    prompter: &'a P,
    output: &'a OutputManager,
    platform: &'a str,
    limit: usize,
}

impl<'a, T, L, P> VersionSelector<'a, T, L, P>
where
    T: TagSource,
    L: ReleaseLookup,
    P: Prompter,
{
    /// Create a selector offering at most `limit` tags
    pub fn new(
        tags: &'a T,
        lookup: &'a L,
        prompter: &'a P,
        output: &'a OutputManager,
        platform: &'a str,
        limit: usize,
    ) -> Self {
        Self {
            tags,
            lookup,
            prompter,
            output,
            platform,
            limit,
        }
    }

    /// List, prompt, confirm pre-releases, then resolve the asset
    pub async fn choose(&self) -> Result<Selection> {
        let tags = self.tags.list_tags()?;
        let recent = recent_tags(&tags, self.limit);
        let default = match recent.last() {
            Some(tag) => tag.version.clone(),
            None => return Err(GitHubError::NoVersions.into()),
        };

        self.print_table(recent);

        let version = self.prompter.input("Select VERSION", Some(&default))?;

        if is_prerelease(&version)
            && !self
                .prompter
                .confirm("Are you sure want to deploy a non-master version?", false)?
        {
            self.output.error("Cancelled");
            return Ok(Selection::Cancelled);
        }

        let selected = resolve_asset(self.lookup, &version, self.platform).await?;
        let _ = self
            .output
            .status(&format!("Found asset url: {}", selected.asset_url));
        Ok(Selection::Chosen(selected))
    }

    fn print_table(&self, tags: &[ReleaseTag]) {
        let width = tags
            .iter()
            .map(|t| t.version.chars().count())
            .max()
            .unwrap_or(1)
            + 2;

        let _ = self.output.println("");
        let _ = self.output.table_row("Version", "Comment", width);
        let _ = self.output.rule(RULE_WIDTH);

        for tag in tags {
            let lines = tag.comment_lines();
            let _ = self.output.table_row(&tag.version, lines[0], width);
            for line in &lines[1..] {
                let _ = self.output.table_row("", line, width);
            }
        }
        let _ = self.output.println("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::Release;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    struct FixedTags(Vec<ReleaseTag>);

    impl TagSource for FixedTags {
        fn list_tags(&self) -> Result<Vec<ReleaseTag>> {
            Ok(self.0.clone())
        }
    }

    struct FixedReleases {
        json: &'static str,
        calls: Cell<usize>,
    }

    impl ReleaseLookup for FixedReleases {
        async fn list_releases(&self) -> Result<Vec<Release>> {
            self.calls.set(self.calls.get() + 1);
            Ok(serde_json::from_str(self.json).expect("fixture parses"))
        }
    }

    /// Answers prompts from a queue; an empty answer takes the default
    struct Answers(RefCell<VecDeque<&'static str>>);

    impl Answers {
        fn new(answers: &[&'static str]) -> Self {
            Self(RefCell::new(answers.iter().copied().collect()))
        }
    }

    impl Prompter for Answers {
        fn input(&self, _prompt: &str, default: Option<&str>) -> Result<String> {
            let answer = self.0.borrow_mut().pop_front().unwrap_or("");
            Ok(match (answer, default) {
                ("", Some(d)) => d.to_string(),
                (a, _) => a.to_string(),
            })
        }

        fn confirm(&self, _prompt: &str, default: bool) -> Result<bool> {
            Ok(match self.0.borrow_mut().pop_front().unwrap_or("") {
                "" => default,
                a => a.eq_ignore_ascii_case("y"),
            })
        }
    }

    const RELEASES: &str = r#"[
        {"name": "v1.11.0", "tag_name": "v1.11.0", "assets": [
            {"name": "flowserver_1.11.0_linux_amd64.tar.gz",
             "url": "https://api.github.com/repos/acme/flowserver/releases/assets/111"}]},
        {"name": "v1.10.0-rc1", "tag_name": "v1.10.0-rc1", "assets": [
            {"name": "flowserver_1.10.0-rc1_linux_amd64.tar.gz",
             "url": "https://api.github.com/repos/acme/flowserver/releases/assets/100"}]}
    ]"#;

    fn tags(count: usize) -> FixedTags {
        FixedTags(
            (0..count)
                .map(|i| ReleaseTag::from_subject(format!("v1.{}.0", i), "notes", i as i64))
                .collect(),
        )
    }

    fn lookup() -> FixedReleases {
        FixedReleases {
            json: RELEASES,
            calls: Cell::new(0),
        }
    }

    fn quiet() -> OutputManager {
        OutputManager::new(false, true)
    }

    #[test]
    fn test_recent_tags_keeps_newest_last() {
        let all = tags(12).0;
        let recent = recent_tags(&all, 10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].version, "v1.2.0");
        assert_eq!(recent[9].version, "v1.11.0");
        assert_eq!(recent, &all[2..]);
    }

    #[test]
    fn test_recent_tags_short_list() {
        let all = tags(3).0;
        assert_eq!(recent_tags(&all, 10), &all[..]);
        assert!(recent_tags(&[], 10).is_empty());
    }

    #[tokio::test]
    async fn test_default_is_newest_tag() {
        let (tags, lookup, answers, output) = (tags(12), lookup(), Answers::new(&[""]), quiet());
        let selector = VersionSelector::new(&tags, &lookup, &answers, &output, "linux_amd64", 10);
        match selector.choose().await.expect("choose") {
            Selection::Chosen(selected) => {
                assert_eq!(selected.version, "v1.11.0");
                assert!(selected.asset_url.as_str().ends_with("/assets/111"));
            }
            Selection::Cancelled => panic!("unexpected cancel"),
        }
    }

    #[tokio::test]
    async fn test_prerelease_without_confirmation_stops_before_lookup() {
        let (tags, lookup, output) = (tags(2), lookup(), quiet());
        let answers = Answers::new(&["v1.10.0-rc1", ""]);
        let selector = VersionSelector::new(&tags, &lookup, &answers, &output, "linux_amd64", 10);
        assert_eq!(selector.choose().await.expect("choose"), Selection::Cancelled);
        assert_eq!(lookup.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_prerelease_with_confirmation_resolves() {
        let (tags, lookup, output) = (tags(2), lookup(), quiet());
        let answers = Answers::new(&["v1.10.0-rc1", "y"]);
        let selector = VersionSelector::new(&tags, &lookup, &answers, &output, "linux_amd64", 10);
        assert!(matches!(
            selector.choose().await.expect("choose"),
            Selection::Chosen(_)
        ));
        assert_eq!(lookup.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_unknown_release_is_not_found() {
        let (tags, lookup, output) = (tags(2), lookup(), quiet());
        let answers = Answers::new(&["v9.9.9"]);
        let selector = VersionSelector::new(&tags, &lookup, &answers, &output, "linux_amd64", 10);
        let err = selector.choose().await.expect_err("no release");
        assert!(err.is_resolution_failure());
    }

    #[tokio::test]
    async fn test_no_tags() {
        let (tags, lookup, answers, output) = (tags(0), lookup(), Answers::new(&[]), quiet());
        let selector = VersionSelector::new(&tags, &lookup, &answers, &output, "linux_amd64", 10);
        assert!(matches!(
            selector.choose().await,
            Err(crate::error::DeployError::GitHub(GitHubError::NoVersions))
        ));
    }
}
