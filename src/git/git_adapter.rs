//! gix-backed implementation of [`TagSource`].

use crate::error::{GitError, Result};
use crate::git::{ReleaseTag, TagSource, sort_by_authored};
use std::path::{Path, PathBuf};

/// Reads tags from a local repository
#[derive(Debug)]
pub struct GixTagSource {
    repo: gix::Repository,
}

impl GixTagSource {
    /// Open the repository at `path` (no upward discovery)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = gix::open(path).map_err(|_| GitError::NotRepository {
            path: path.to_path_buf(),
        })?;
        Ok(Self { repo })
    }

    /// Discover the repository containing `path`
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = gix::discover(path).map_err(|_| GitError::NotRepository {
            path: path.to_path_buf(),
        })?;
        Ok(Self { repo })
    }

    /// Work tree (or git dir for bare repositories)
    pub fn path(&self) -> PathBuf {
        self.repo
            .workdir()
            .unwrap_or_else(|| self.repo.git_dir())
            .to_path_buf()
    }

    fn read_tag(&self, reference: &mut gix::Reference<'_>) -> Result<Option<ReleaseTag>> {
        let version = reference.name().shorten().to_string();

        // Annotated tags carry their own message; read it before peeling
        let annotation = match reference.target().try_id() {
            Some(id) => {
                let object = self.repo.find_object(id).map_err(read_failed)?;
                if object.kind == gix::object::Kind::Tag {
                    let tag = object.try_into_tag().map_err(read_failed)?;
                    let decoded = tag.decode().map_err(read_failed)?;
                    Some(decoded.message.to_string())
                } else {
                    None
                }
            }
            None => None,
        };

        let id = reference.peel_to_id_in_place().map_err(read_failed)?;
        let commit = match id.object().map_err(read_failed)?.try_into_commit() {
            Ok(commit) => commit,
            Err(_) => {
                log::debug!("Skipping tag {} (does not point at a commit)", version);
                return Ok(None);
            }
        };

        // Parse git time format: "<seconds> <timezone>"
        let author = commit.author().map_err(read_failed)?;
        let authored_at = author
            .time
            .split_whitespace()
            .next()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(0);

        let subject = match annotation {
            Some(message) => subject_of(&message),
            None => commit
                .message()
                .map(|m| m.summary().to_string())
                .unwrap_or_default(),
        };

        Ok(Some(ReleaseTag::from_subject(version, &subject, authored_at)))
    }
}

impl TagSource for GixTagSource {
    fn list_tags(&self) -> Result<Vec<ReleaseTag>> {
        let platform = self.repo.references().map_err(read_failed)?;
        let iter = platform.tags().map_err(read_failed)?;

        let mut tags = Vec::new();
        for reference in iter {
            let mut reference = reference.map_err(|e| GitError::TagReadFailed {
                reason: e.to_string(),
            })?;
            if let Some(tag) = self.read_tag(&mut reference)? {
                tags.push(tag);
            }
        }

        sort_by_authored(&mut tags);
        log::debug!("Found {} tag(s) in {}", tags.len(), self.path().display());
        Ok(tags)
    }
}

/// First paragraph of a message with its line breaks folded into spaces
fn subject_of(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .skip_while(|line| line.is_empty())
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn read_failed<E: std::fmt::Display>(e: E) -> GitError {
    GitError::TagReadFailed {
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    fn git(dir: &Path, args: &[&str], date: &str) -> String {
        let output = Command::new("git")
            .args([
                "-c",
                "user.name=Deployer",
                "-c",
                "user.email=deploy@example.com",
                "-c",
                "commit.gpgSign=false",
                "-c",
                "tag.gpgSign=false",
            ])
            .args(args)
            .current_dir(dir)
            .env("GIT_AUTHOR_DATE", date)
            .env("GIT_COMMITTER_DATE", date)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .output()
            .expect("git runs");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Two commits: `v1.0.0` annotated on the older one, `v1.1.0`
    /// lightweight on the newer one, `snapshot` pointing at a tree
    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path();
        git(path, &["init", "-q"], "1600000000 +0000");
        git(path, &["commit", "-q", "--allow-empty", "-m", "first cut"], "1600000000 +0000");
        git(
            path,
            &["tag", "-a", "v1.0.0", "-m", "* fix login\n* add export"],
            "1600000000 +0000",
        );
        git(path, &["commit", "-q", "--allow-empty", "-m", "faster flows"], "1700000000 +0000");
        git(path, &["tag", "v1.1.0"], "1700000000 +0000");
        let tree = git(path, &["rev-parse", "HEAD^{tree}"], "1700000000 +0000");
        git(path, &["tag", "snapshot", &tree], "1700000000 +0000");
        dir
    }

    #[test]
    fn test_open_rejects_plain_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = GixTagSource::open(dir.path());
        assert!(matches!(
            result,
            Err(crate::error::DeployError::Git(GitError::NotRepository { .. }))
        ));
    }

    #[test]
    fn test_subject_folds_first_paragraph() {
        assert_eq!(
            subject_of("* fix login\n* add export\n\nlonger body\n"),
            "* fix login * add export"
        );
        assert_eq!(subject_of("\nsingle line\n"), "single line");
        assert_eq!(subject_of(""), "");
    }

    #[test]
    fn test_list_tags_from_repository() {
        let dir = fixture();
        let tags = GixTagSource::open(dir.path())
            .expect("opens")
            .list_tags()
            .expect("lists");

        let versions: Vec<&str> = tags.iter().map(|t| t.version.as_str()).collect();
        assert_eq!(versions, vec!["v1.0.0", "v1.1.0"]);

        assert_eq!(tags[0].comment, "fix login\nadd export");
        assert_eq!(tags[0].authored_at, 1_600_000_000);
        assert_eq!(tags[1].comment, "faster flows");
        assert_eq!(tags[1].authored_at, 1_700_000_000);
    }
}
