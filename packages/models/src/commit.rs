use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::changeset::RawChangeset;

/// A changeset that fell inside the requested window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub repo_name: String,
    pub branch: Option<String>,
    pub short_hash: String,
    pub full_hash: String,
    pub author: String,
    pub raw_author: String,
    pub timestamp: DateTime<Utc>,
    /// Single-line message, truncated when a limit was configured.
    pub message: String,
}

impl Commit {
    /// Build a commit from a raw changeset.
    ///
    /// Newlines and carriage returns are removed from the message, which is
    /// then cut to `truncate_length` characters. A `truncate_length` of `0`
    /// keeps the whole message.
    #[must_use]
    pub fn from_changeset(repo_name: &str, changeset: &RawChangeset, truncate_length: usize) -> Self {
        Self {
            repo_name: repo_name.to_string(),
            branch: changeset.branch.clone(),
            short_hash: changeset.node.clone(),
            full_hash: changeset.raw_node.clone(),
            author: changeset.author.clone(),
            raw_author: changeset.raw_author.clone(),
            timestamp: changeset.timestamp,
            message: clean_message(&changeset.message, truncate_length),
        }
    }

    /// Commit date as `DD/MM/YYYY` in UTC.
    #[must_use]
    pub fn short_date(&self) -> String {
        self.timestamp.format("%d/%m/%Y").to_string()
    }
}

fn clean_message(message: &str, truncate_length: usize) -> String {
    let stripped = message.chars().filter(|c| !matches!(c, '\n' | '\r'));

    if truncate_length == 0 {
        stripped.collect()
    } else {
        stripped.take(truncate_length).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(message: &str) -> RawChangeset {
        RawChangeset {
            node: "3f2a9c1d0b7e".to_string(),
            raw_node: "3f2a9c1d0b7e5a6b4c3d2e1f0a9b8c7d6e5f4a3b".to_string(),
            author: "jdoe".to_string(),
            raw_author: "John Doe <jdoe@example.com>".to_string(),
            branch: Some("default".to_string()),
            timestamp: Utc.with_ymd_and_hms(2024, 2, 7, 16, 45, 0).unwrap(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_truncate_to_five_chars() {
        let commit = Commit::from_changeset("core", &raw("hello world"), 5);
        assert_eq!(commit.message, "hello");
    }

    #[test]
    fn test_zero_truncation_keeps_full_message() {
        let commit = Commit::from_changeset("core", &raw("hello world"), 0);
        assert_eq!(commit.message, "hello world");
    }

    #[test]
    fn test_newlines_are_stripped_before_truncation() {
        let commit = Commit::from_changeset("core", &raw("fix\r\nbuild\nscript"), 0);
        assert_eq!(commit.message, "fixbuildscript");

        let commit = Commit::from_changeset("core", &raw("ab\ncdef"), 3);
        assert_eq!(commit.message, "abc");
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let commit = Commit::from_changeset("core", &raw("ação rápida"), 3);
        assert_eq!(commit.message, "açã");
    }

    #[test]
    fn test_short_date_format() {
        let commit = Commit::from_changeset("core", &raw("x"), 0);
        assert_eq!(commit.short_date(), "07/02/2024");
    }

    #[test]
    fn test_fields_are_copied() {
        let commit = Commit::from_changeset("core", &raw("x"), 0);
        assert_eq!(commit.repo_name, "core");
        assert_eq!(commit.short_hash, "3f2a9c1d0b7e");
        assert_eq!(commit.full_hash.len(), 40);
        assert_eq!(commit.raw_author, "John Doe <jdoe@example.com>");
        assert_eq!(commit.branch.as_deref(), Some("default"));
    }
}
