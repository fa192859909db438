use std::time::Duration;

use baseline_bitbucket_models::{BitbucketChangeset, BitbucketRepository, ChangesetsResponse};
use baseline_provider::{
    ChangesetPage, Cursor, ProviderError, RawChangeset, RepositoryHandle, RepositorySummary,
    SourceProvider,
};
use serde::de::DeserializeOwned;

pub const DEFAULT_BASE_URL: &str = "https://api.bitbucket.org/1.0";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Clone)]
struct BitbucketApi {
    http_client: reqwest::Client,
    credentials: Option<Credentials>,
    base_url: String,
    timeout: Duration,
}

impl BitbucketApi {
    async fn get<T: DeserializeOwned + Send>(
        &self,
        url: &str,
        query: &[(&str, String)],
        not_found: impl FnOnce() -> ProviderError + Send,
    ) -> Result<T, ProviderError> {
        log::debug!("GET {url} {query:?}");
        let mut request = self
            .http_client
            .get(url)
            .header("Accept", "application/json")
            .query(query)
            .timeout(self.timeout);

        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Bitbucket API error: {status} {body}");

            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Auth {
                    message: status.to_string(),
                },
                404 => not_found(),
                _ => ProviderError::network(format!("Bitbucket API error: {status}")),
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(&e))?;

        serde_json::from_str(&body).map_err(|e| ProviderError::parse(e.to_string()))
    }

    fn transport_error(&self, error: &reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else if error.is_decode() {
            ProviderError::parse(error.to_string())
        } else {
            ProviderError::network(error.to_string())
        }
    }
}

pub struct BitbucketProvider {
    api: BitbucketApi,
}

impl BitbucketProvider {
    /// Create a new Bitbucket provider without authentication.
    ///
    /// # Panics
    ///
    /// * If the `reqwest::Client` fails to build.
    #[must_use]
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent("baseline")
            .build()
            .unwrap();
        Self {
            api: BitbucketApi {
                http_client,
                credentials: None,
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout: DEFAULT_TIMEOUT,
            },
        }
    }

    /// Credentials are forwarded as HTTP basic auth.
    #[must_use]
    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.api.credentials = Some(Credentials { username, password });
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.api.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.api.timeout = timeout;
        self
    }
}

impl Default for BitbucketProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SourceProvider for BitbucketProvider {
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, ProviderError> {
        let url = format!("{}/user/repositories", self.api.base_url);

        let repositories: Vec<BitbucketRepository> = self
            .api
            .get(&url, &[], || ProviderError::Auth {
                message: "user repositories endpoint not found".to_string(),
            })
            .await?;

        repositories
            .into_iter()
            .map(RepositorySummary::try_from)
            .collect()
    }

    async fn get_repository(
        &self,
        owner: &str,
        slug: &str,
    ) -> Result<Box<dyn RepositoryHandle>, ProviderError> {
        let url = format!("{}/repositories/{}/{}", self.api.base_url, owner, slug);

        let repository: BitbucketRepository = self
            .api
            .get(&url, &[], || ProviderError::NotFound {
                owner: owner.to_string(),
                name: slug.to_string(),
            })
            .await?;

        Ok(Box::new(BitbucketRepositoryHandle {
            api: self.api.clone(),
            owner: repository.owner,
            slug: repository.slug.unwrap_or_else(|| slug.to_string()),
            name: repository.name,
        }))
    }

    fn provider_name(&self) -> &'static str {
        "bitbucket"
    }
}

pub struct BitbucketRepositoryHandle {
    api: BitbucketApi,
    owner: String,
    slug: String,
    name: String,
}

#[async_trait::async_trait]
impl RepositoryHandle for BitbucketRepositoryHandle {
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
        let url = format!(
            "{}/repositories/{}/{}/changesets",
            self.api.base_url, self.owner, self.slug
        );
        let query = [
            ("limit", limit.to_string()),
            ("start", cursor.as_str().to_string()),
        ];

        let response: ChangesetsResponse = self
            .api
            .get(&url, &query, || ProviderError::NotFound {
                owner: self.owner.clone(),
                name: self.slug.clone(),
            })
            .await?;

        to_page(response.changesets)
    }
}

/// Upstream delivers oldest first; pages are kept newest first.
fn to_page(changesets: Vec<BitbucketChangeset>) -> Result<ChangesetPage, ProviderError> {
    let mut changesets = changesets
        .into_iter()
        .map(RawChangeset::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    changesets.reverse();

    Ok(ChangesetPage::new(changesets))
}
