use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository as returned by the repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub owner: String,
    pub name: String,
    /// URL-safe identifier used for detail and changeset lookups.
    pub slug: String,
    pub last_updated: DateTime<Utc>,
}

impl RepositorySummary {
    /// Create a summary whose slug is the lowercased name.
    #[must_use]
    pub fn new(owner: &str, name: &str, last_updated: DateTime<Utc>) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            last_updated,
        }
    }

    #[must_use]
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = slug.to_string();
        self
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.slug)
    }
}
