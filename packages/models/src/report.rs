use serde::{Deserialize, Serialize};

use crate::commit::Commit;

/// Result of resolving one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryReport {
    pub owner: String,
    pub name: String,
    /// Commits in the window, oldest first. Partial when `error` is set.
    pub commits: Vec<Commit>,
    pub error: Option<String>,
}

impl RepositoryReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Result of a full scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Repositories returned by the listing.
    pub total_repositories: usize,
    /// Repositories that passed the date and prefix filters.
    pub matched_repositories: usize,
    /// Reports kept for output, in listing order.
    pub reports: Vec<RepositoryReport>,
}

impl ScanSummary {
    #[must_use]
    pub fn commit_count(&self) -> usize {
        self.reports.iter().map(|r| r.commits.len()).sum()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.reports.iter().filter(|r| r.error.is_some()).count()
    }
}
