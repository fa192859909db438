#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Wire types for the Bitbucket 1.0 REST API.

use baseline_models::{ProviderError, RawChangeset, RepositorySummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout used by the 1.0 API, e.g. `2013-03-12 19:47:11+00:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitbucketRepository {
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub utc_last_updated: String,
    #[serde(default)]
    pub scm: Option<String>,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitbucketChangeset {
    pub node: String,
    pub raw_node: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub raw_author: String,
    #[serde(default)]
    pub branch: Option<String>,
    pub utctimestamp: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub parents: Vec<String>,
}

/// Body of `GET /repositories/{owner}/{slug}/changesets`.
///
/// `changesets` is delivered oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesetsResponse {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub changesets: Vec<BitbucketChangeset>,
}

/// Parse a Bitbucket timestamp into UTC.
///
/// Accepts the 1.0 API layout as well as RFC 3339.
///
/// # Errors
///
/// * `ProviderError::Parse` if neither layout matches.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ProviderError> {
    DateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ProviderError::parse(format!("invalid timestamp '{value}': {e}")))
}

impl TryFrom<BitbucketRepository> for RepositorySummary {
    type Error = ProviderError;

    fn try_from(value: BitbucketRepository) -> Result<Self, Self::Error> {
        let last_updated = parse_timestamp(&value.utc_last_updated)?;
        let summary = Self::new(&value.owner, &value.name, last_updated);

        Ok(match value.slug.as_deref() {
            Some(slug) if !slug.is_empty() => summary.with_slug(slug),
            _ => summary,
        })
    }
}

impl TryFrom<BitbucketChangeset> for RawChangeset {
    type Error = ProviderError;

    fn try_from(value: BitbucketChangeset) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamp: parse_timestamp(&value.utctimestamp)?,
            node: value.node,
            raw_node: value.raw_node,
            author: value.author,
            raw_author: value.raw_author,
            branch: value.branch,
            message: value.message,
        })
    }
}
