use baseline_models::{ChangesetPage, Cursor, ProviderError, RepositorySummary};

/// Entry point to a hosting service for one authenticated user.
#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    /// List every repository the user can access.
    ///
    /// # Errors
    ///
    /// * `ProviderError::Auth` if the credentials are rejected.
    /// * `ProviderError::Network` on transport failure.
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, ProviderError>;

    /// Open a single repository for history queries.
    ///
    /// # Errors
    ///
    /// * `ProviderError::NotFound` if the repository does not exist.
    /// * `ProviderError::Network` on transport failure.
    async fn get_repository(
        &self,
        owner: &str,
        slug: &str,
    ) -> Result<Box<dyn RepositoryHandle>, ProviderError>;

    fn provider_name(&self) -> &str;
}

/// An opened repository.
#[async_trait::async_trait]
pub trait RepositoryHandle: Send + Sync {
    fn owner(&self) -> &str;

    /// Display name of the repository.
    fn name(&self) -> &str;

    /// Fetch up to `limit` changesets ending at `cursor`, newest first.
    ///
    /// When `cursor` is a hash, that changeset is included as the newest
    /// entry of the page.
    ///
    /// # Errors
    ///
    /// * `ProviderError::Parse` if the response could not be decoded.
    /// * `ProviderError::Network` on transport failure.
    async fn fetch_changesets(
        &self,
        limit: usize,
        cursor: &Cursor,
    ) -> Result<ChangesetPage, ProviderError>;
}
