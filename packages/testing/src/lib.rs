#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

use std::{collections::HashMap, collections::VecDeque, sync::Arc, time::Duration};

use baseline_provider::{
    ChangesetPage, Cursor, ProviderError, RawChangeset, RepositoryHandle, RepositorySummary,
    SourceProvider,
};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// Build a changeset whose full hash is `seed` rendered as 40 hex digits.
#[must_use]
pub fn changeset(seed: u64, timestamp: DateTime<Utc>, message: &str) -> RawChangeset {
    let raw_node = format!("{seed:040x}");
    RawChangeset {
        node: raw_node[28..].to_string(),
        raw_node,
        author: "test-user".to_string(),
        raw_author: "Test User <test-user@example.com>".to_string(),
        branch: Some("default".to_string()),
        timestamp,
        message: message.to_string(),
    }
}

/// Shared state of one mock repository: its history, pending failures and
/// the cursors it was asked for.
#[derive(Default)]
pub struct MockHistory {
    changesets: Vec<RawChangeset>,
    failures: Mutex<VecDeque<ProviderError>>,
    failures_after: usize,
    requests: Mutex<Vec<Cursor>>,
    fetch_delay: Option<Duration>,
}

impl MockHistory {
    /// Cursors requested so far, in order.
    pub async fn requests(&self) -> Vec<Cursor> {
        self.requests.lock().await.clone()
    }

    pub async fn fetch_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn page(&self, limit: usize, cursor: &Cursor) -> Result<ChangesetPage, ProviderError> {
        let index = {
            let mut requests = self.requests.lock().await;
            requests.push(cursor.clone());
            requests.len() - 1
        };

        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }

        let failure = if index >= self.failures_after {
            self.failures.lock().await.pop_front()
        } else {
            None
        };

        if let Some(error) = failure {
            log::debug!("mock fetch at {cursor} failing with {error}");
            return Err(error);
        }

        let start = match cursor {
            Cursor::Head => 0,
            Cursor::Hash(hash) => self
                .changesets
                .iter()
                .position(|c| &c.raw_node == hash)
                .ok_or_else(|| ProviderError::network(format!("unknown changeset {hash}")))?,
        };
        let end = (start + limit).min(self.changesets.len());

        Ok(ChangesetPage::new(self.changesets[start..end].to_vec()))
    }
}

#[derive(Clone)]
pub struct MockRepository {
    summary: RepositorySummary,
    history: Arc<MockHistory>,
}

impl MockRepository {
    #[must_use]
    pub fn new(owner: &str, name: &str, last_updated: DateTime<Utc>) -> Self {
        Self {
            summary: RepositorySummary::new(owner, name, last_updated),
            history: Arc::new(MockHistory::default()),
        }
    }

    /// Set the history. Order does not matter; it is served newest first.
    ///
    /// # Panics
    ///
    /// * If called after the repository has been shared.
    #[must_use]
    pub fn with_history(mut self, mut changesets: Vec<RawChangeset>) -> Self {
        changesets.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.history_mut().changesets = changesets;
        self
    }

    /// Errors returned, in order, by the next fetches before history is served.
    ///
    /// # Panics
    ///
    /// * If called after the repository has been shared.
    #[must_use]
    pub fn with_failures(mut self, failures: Vec<ProviderError>) -> Self {
        self.history_mut().failures = Mutex::new(failures.into());
        self
    }

    /// Like [`Self::with_failures`], but only once `successes` fetches have
    /// been served.
    ///
    /// # Panics
    ///
    /// * If called after the repository has been shared.
    #[must_use]
    pub fn with_failures_after(self, successes: usize, failures: Vec<ProviderError>) -> Self {
        let mut repository = self.with_failures(failures);
        repository.history_mut().failures_after = successes;
        repository
    }

    /// # Panics
    ///
    /// * If called after the repository has been shared.
    #[must_use]
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.history_mut().fetch_delay = Some(delay);
        self
    }

    fn history_mut(&mut self) -> &mut MockHistory {
        Arc::get_mut(&mut self.history).expect("MockRepository configured after being shared")
    }

    #[must_use]
    pub const fn summary(&self) -> &RepositorySummary {
        &self.summary
    }

    #[must_use]
    pub fn history(&self) -> Arc<MockHistory> {
        self.history.clone()
    }

    #[must_use]
    pub fn handle(&self) -> MockRepositoryHandle {
        MockRepositoryHandle {
            owner: self.summary.owner.clone(),
            name: self.summary.name.clone(),
            history: self.history.clone(),
        }
    }
}

pub struct MockRepositoryHandle {
    owner: String,
    name: String,
    history: Arc<MockHistory>,
}

#[async_trait::async_trait]
impl RepositoryHandle for MockRepositoryHandle {
    fn owner(&self) -> &str {
        &self.owner
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_changesets(
        &self,
        limit: usize,
        cursor: &Cursor,
    ) -> Result<ChangesetPage, ProviderError> {
        self.history.page(limit, cursor).await
    }
}

#[derive(Default)]
pub struct MockProvider {
    repositories: Vec<MockRepository>,
    list_error: Option<ProviderError>,
    detail_errors: HashMap<String, ProviderError>,
}

impl MockProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_repository(mut self, repository: MockRepository) -> Self {
        self.repositories.push(repository);
        self
    }

    #[must_use]
    pub fn with_list_error(mut self, error: ProviderError) -> Self {
        self.list_error = Some(error);
        self
    }

    /// Make `get_repository` fail for the given slug.
    #[must_use]
    pub fn with_detail_error(mut self, slug: &str, error: ProviderError) -> Self {
        self.detail_errors.insert(slug.to_string(), error);
        self
    }
}

#[async_trait::async_trait]
impl SourceProvider for MockProvider {
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, ProviderError> {
        if let Some(error) = &self.list_error {
            return Err(error.clone());
        }

        Ok(self
            .repositories
            .iter()
            .map(|r| r.summary.clone())
            .collect())
    }

    async fn get_repository(
        &self,
        owner: &str,
        slug: &str,
    ) -> Result<Box<dyn RepositoryHandle>, ProviderError> {
        if let Some(error) = self.detail_errors.get(slug) {
            return Err(error.clone());
        }

        self.repositories
            .iter()
            .find(|r| r.summary.owner == owner && r.summary.slug == slug)
            .map(|r| Box::new(r.handle()) as Box<dyn RepositoryHandle>)
            .ok_or_else(|| ProviderError::NotFound {
                owner: owner.to_string(),
                name: slug.to_string(),
            })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
