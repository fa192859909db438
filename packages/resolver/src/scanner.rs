use std::sync::Arc;

use baseline_provider::{
    ProviderError, RepositoryReport, RepositorySummary, ScanSummary, SourceProvider,
};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::config::ScanConfig;
use crate::filter::{matches_prefix, updated_since};
use crate::resolver::CommitWindowResolver;

/// Failures that abort a whole scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The repository listing failed, usually bad credentials or no network.
    #[error("Failed to list repositories: {0}")]
    Listing(#[source] ProviderError),

    /// Cancelled before the listing completed.
    #[error("Scan cancelled")]
    Cancelled,
}

/// Runs the resolver over every accessible repository that passes the
/// date and prefix filters.
pub struct Scanner {
    provider: Arc<dyn SourceProvider>,
    config: ScanConfig,
    resolver: CommitWindowResolver,
}

impl Scanner {
    #[must_use]
    pub fn new(provider: Arc<dyn SourceProvider>, config: ScanConfig) -> Self {
        let resolver = CommitWindowResolver::new(config.resolver.clone());
        Self {
            provider,
            config,
            resolver,
        }
    }

    /// Scan all repositories.
    ///
    /// Per-repository failures end up in that repository's report; only the
    /// listing can fail the scan. Once `cancel` fires, repositories not yet
    /// started are skipped and in-flight ones return what they have.
    ///
    /// # Errors
    ///
    /// * `ScanError::Listing` if the repositories cannot be listed.
    /// * `ScanError::Cancelled` if cancelled during the listing.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<ScanSummary, ScanError> {
        let repositories = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ScanError::Cancelled),
            result = self.provider.list_repositories() => result.map_err(ScanError::Listing)?,
        };
        let total_repositories = repositories.len();
        log::info!(
            "Found {total_repositories} repositories on {}",
            self.provider.provider_name()
        );

        let matched = self.filter(repositories);
        log::info!("Scanning {} repositories...", matched.len());

        let reports: Vec<RepositoryReport> = futures::stream::iter(&matched)
            .map(|repository| self.scan_repository(repository, cancel))
            .buffered(self.config.concurrency)
            .filter_map(|report| async move { report })
            .collect()
            .await;

        Ok(ScanSummary {
            total_repositories,
            matched_repositories: matched.len(),
            reports: reports
                .into_iter()
                .filter(|r| self.config.show_empty || !r.is_empty() || r.error.is_some())
                .collect(),
        })
    }

    fn filter(&self, repositories: Vec<RepositorySummary>) -> Vec<RepositorySummary> {
        let window = self.config.window();
        let prefix = self.config.prefix.as_deref();

        repositories
            .into_iter()
            .filter(|r| updated_since(r, window) && matches_prefix(&r.name, prefix))
            .collect()
    }

    async fn scan_repository(
        &self,
        repository: &RepositorySummary,
        cancel: &CancellationToken,
    ) -> Option<RepositoryReport> {
        if cancel.is_cancelled() {
            log::debug!("Skipping {}: cancelled", repository.full_name());
            return None;
        }

        log::info!("Querying repository {}...", repository.name);

        let handle = match self
            .provider
            .get_repository(&repository.owner, &repository.slug)
            .await
        {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("Skipping {}: {e}", repository.full_name());
                return Some(RepositoryReport {
                    owner: repository.owner.clone(),
                    name: repository.slug.clone(),
                    commits: vec![],
                    error: Some(e.to_string()),
                });
            }
        };

        let outcome = self.resolver.resolve(handle.as_ref(), cancel).await;
        log::debug!(
            "{}: {} commit(s), {} page(s), {} retr(ies)",
            repository.full_name(),
            outcome.commits.len(),
            outcome.pages_fetched,
            outcome.retries
        );

        Some(RepositoryReport {
            owner: repository.owner.clone(),
            name: repository.slug.clone(),
            commits: outcome.commits,
            error: outcome.error.map(|e| e.to_string()),
        })
    }
}
