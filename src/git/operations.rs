//! Release tag model and the trait for listing tags.

use crate::error::Result;

/// Trait implemented by anything that can list release tags
pub trait TagSource {
    /// All release tags ordered by authoring date, oldest first
    fn list_tags(&self) -> Result<Vec<ReleaseTag>>;
}

/// A version tag with its (possibly multi-line) comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    /// Tag name, e.g. `v1.4.2`
    pub version: String,
    /// Comment lines shown next to the version
    pub comment: String,
    /// Author timestamp (seconds since epoch) used for ordering
    pub authored_at: i64,
}

impl ReleaseTag {
    /// Build a tag from its name and subject line.
    ///
    /// Subjects written as a run of `* item` bullets (`* fix a * fix b`) are
    /// split into one line per item.
    pub fn from_subject(version: impl Into<String>, subject: &str, authored_at: i64) -> Self {
        let trimmed = subject.trim_start();
        let comment = if trimmed.starts_with("* ") {
            format!(" {}", trimmed)
                .split(" * ")
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            subject.trim().to_string()
        };

        Self {
            version: version.into(),
            comment,
            authored_at,
        }
    }

    /// Comment split into display lines (always at least one)
    pub fn comment_lines(&self) -> Vec<&str> {
        let lines: Vec<&str> = self.comment.lines().collect();
        if lines.is_empty() { vec![""] } else { lines }
    }
}

/// Sort tags oldest first, keeping input order for equal timestamps
pub fn sort_by_authored(tags: &mut [ReleaseTag]) {
    tags.sort_by_key(|tag| tag.authored_at);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_subject() {
        let tag = ReleaseTag::from_subject("v1.0.0", "Initial release ", 1);
        assert_eq!(tag.comment, "Initial release");
        assert_eq!(tag.comment_lines(), vec!["Initial release"]);
    }

    #[test]
    fn test_bullet_subject_is_split() {
        let tag = ReleaseTag::from_subject("v1.1.0", " * fix login * add export", 2);
        assert_eq!(tag.comment, "fix login\nadd export");
        assert_eq!(tag.comment_lines(), vec!["fix login", "add export"]);
    }

    #[test]
    fn test_inline_asterisk_is_kept() {
        let tag = ReleaseTag::from_subject("v1.2.0", "multiply a * b", 3);
        assert_eq!(tag.comment, "multiply a * b");
    }

    #[test]
    fn test_empty_comment_has_one_line() {
        let tag = ReleaseTag::from_subject("v0.1.0", "", 0);
        assert_eq!(tag.comment_lines(), vec![""]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut tags = vec![
            ReleaseTag::from_subject("b", "", 5),
            ReleaseTag::from_subject("a", "", 1),
            ReleaseTag::from_subject("c", "", 5),
        ];
        sort_by_authored(&mut tags);
        let order: Vec<&str> = tags.iter().map(|t| t.version.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
