use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position in the changeset history from which a page is requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cursor {
    /// The most recent changeset.
    #[default]
    Head,
    /// A specific changeset, by full hash.
    Hash(String),
}

impl Cursor {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Head => "HEAD",
            Self::Hash(hash) => hash,
        }
    }

    /// Whether this cursor designates the changeset with the given full hash.
    #[must_use]
    pub fn points_at(&self, raw_node: &str) -> bool {
        matches!(self, Self::Hash(hash) if hash == raw_node)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => f.write_str("HEAD"),
            Self::Hash(hash) => f.write_str(hash.get(..12).unwrap_or(hash)),
        }
    }
}

/// One changeset as delivered by the history API, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChangeset {
    /// Short hash.
    pub node: String,
    /// Full hash.
    pub raw_node: String,
    pub author: String,
    /// Author as recorded in the commit, usually `Name <email>`.
    pub raw_author: String,
    pub branch: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// One page of history, newest changeset first.
///
/// A page requested at `Cursor::Hash(h)` contains `h` itself as its newest
/// entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesetPage {
    pub changesets: Vec<RawChangeset>,
}

impl ChangesetPage {
    #[must_use]
    pub const fn new(changesets: Vec<RawChangeset>) -> Self {
        Self { changesets }
    }

    /// Cursor for the next (older) page: the hash of the oldest entry.
    #[must_use]
    pub fn next_cursor(&self) -> Option<Cursor> {
        self.changesets
            .last()
            .map(|oldest| Cursor::Hash(oldest.raw_node.clone()))
    }

    /// Entries oldest-first.
    pub fn oldest_first(&self) -> impl Iterator<Item = &RawChangeset> {
        self.changesets.iter().rev()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changesets.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changesets.len()
    }
}
