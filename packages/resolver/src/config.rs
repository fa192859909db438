use std::time::Duration;

use baseline_provider::{Cursor, DateWindow};

pub const DEFAULT_PAGE_SIZE: usize = 15;
/// Pages repeat their anchor, so a page needs room for one new changeset.
pub const MIN_PAGE_SIZE: usize = 2;
pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Settings for resolving a single repository. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub window: DateWindow,
    pub page_size: usize,
    /// Maximum message length in characters, `0` for no limit.
    pub truncate_length: usize,
    /// Retries allowed per page for transient failures.
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub fetch_timeout: Duration,
    pub start: Cursor,
}

impl ResolverConfig {
    #[must_use]
    pub const fn new(window: DateWindow) -> Self {
        Self {
            window,
            page_size: DEFAULT_PAGE_SIZE,
            truncate_length: 0,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            start: Cursor::Head,
        }
    }

    /// Page size is clamped to at least [`MIN_PAGE_SIZE`].
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(MIN_PAGE_SIZE);
        self
    }

    #[must_use]
    pub const fn with_truncate_length(mut self, truncate_length: usize) -> Self {
        self.truncate_length = truncate_length;
        self
    }

    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    #[must_use]
    pub const fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    #[must_use]
    pub fn with_start(mut self, start: Cursor) -> Self {
        self.start = start;
        self
    }
}

/// Settings for a full scan across repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub resolver: ResolverConfig,
    /// Case-insensitive repository name prefix.
    pub prefix: Option<String>,
    /// Keep repositories with no commits in the window.
    pub show_empty: bool,
    /// Repositories resolved at the same time.
    pub concurrency: usize,
}

impl ScanConfig {
    #[must_use]
    pub const fn new(resolver: ResolverConfig) -> Self {
        Self {
            resolver,
            prefix: None,
            show_empty: false,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// An empty prefix is the same as no prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    #[must_use]
    pub const fn with_show_empty(mut self, show_empty: bool) -> Self {
        self.show_empty = show_empty;
        self
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub const fn window(&self) -> &DateWindow {
        &self.resolver.window
    }
}
