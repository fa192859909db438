//! Backward-paginated commit-window resolution.
//!
//! History is only reachable as pages of changesets ending at a cursor, newest
//! first. A page requested at hash `h` repeats `h` as its newest entry, so
//! that entry is skipped: it was already classified on the previous page.
//!
//! After each page, the oldest new entry decides whether an older page could
//! still hold commits in the window. History is exhausted when a page brings
//! nothing beyond its anchor, comes back shorter than requested, or would not
//! move the cursor.

use baseline_provider::{
    ChangesetPage, Commit, Cursor, DateWindow, ProviderError, RawChangeset, RepositoryHandle,
};
use tokio_util::sync::CancellationToken;

use crate::config::ResolverConfig;
use crate::filter::in_window;

/// Where a changeset sits relative to the window and the page anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The changeset the page was requested at.
    Anchor,
    InWindow,
    /// At or after `to`; older pages may still reach the window.
    AfterWindow,
    /// Before `from`; nothing older can match.
    BeforeWindow,
}

impl Classification {
    #[must_use]
    pub fn of(changeset: &RawChangeset, anchor: &Cursor, window: &DateWindow) -> Self {
        if anchor.points_at(&changeset.raw_node) {
            Self::Anchor
        } else if in_window(changeset.timestamp, window) {
            Self::InWindow
        } else if changeset.timestamp > window.from {
            Self::AfterWindow
        } else {
            Self::BeforeWindow
        }
    }

    #[must_use]
    pub const fn needs_older_pages(self) -> bool {
        matches!(self, Self::InWindow | Self::AfterWindow)
    }
}

/// What one repository resolved to.
#[derive(Debug, Default)]
pub struct ResolveOutcome {
    /// Commits in the window, oldest first.
    pub commits: Vec<Commit>,
    pub pages_fetched: u32,
    /// Transient failures that were retried.
    pub retries: u32,
    /// Set when resolution stopped early; `commits` is then partial.
    pub error: Option<ProviderError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageDecision {
    Continue,
    Stop,
    Exhausted,
}

struct PageScan {
    commits: Vec<Commit>,
    decision: PageDecision,
}

pub struct CommitWindowResolver {
    config: ResolverConfig,
}

impl CommitWindowResolver {
    #[must_use]
    pub const fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Collect every commit of `handle` that falls in the configured window.
    ///
    /// Never fails: errors are attached to the outcome along with whatever
    /// was collected before them.
    pub async fn resolve(
        &self,
        handle: &dyn RepositoryHandle,
        cancel: &CancellationToken,
    ) -> ResolveOutcome {
        let mut outcome = ResolveOutcome::default();
        let mut cursor = self.config.start.clone();
        let mut batches: Vec<Vec<Commit>> = Vec::new();

        loop {
            log::debug!("{}/{}: FROM {cursor}", handle.owner(), handle.name());

            let page = match self
                .fetch_page(handle, &cursor, cancel, &mut outcome.retries)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    log::warn!(
                        "{}/{}: stopping at {cursor}: {e}",
                        handle.owner(),
                        handle.name()
                    );
                    outcome.error = Some(e);
                    break;
                }
            };
            outcome.pages_fetched += 1;

            let scan = self.scan_page(handle.name(), &page, &cursor);
            batches.push(scan.commits);

            if scan.decision != PageDecision::Continue || page.len() < self.config.page_size {
                log::debug!(
                    "{}/{}: done after {} page(s) ({:?})",
                    handle.owner(),
                    handle.name(),
                    outcome.pages_fetched,
                    scan.decision
                );
                break;
            }

            match page.next_cursor() {
                Some(next) if next != cursor => cursor = next,
                _ => break,
            }
        }

        outcome.commits = batches.into_iter().rev().flatten().collect();
        outcome
    }

    async fn fetch_page(
        &self,
        handle: &dyn RepositoryHandle,
        cursor: &Cursor,
        cancel: &CancellationToken,
        retries: &mut u32,
    ) -> Result<ChangesetPage, ProviderError> {
        let mut attempt = 0;

        loop {
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ProviderError::Cancelled),
                result = tokio::time::timeout(
                    self.config.fetch_timeout,
                    handle.fetch_changesets(self.config.page_size, cursor),
                ) => result.unwrap_or_else(|_| Err(ProviderError::Timeout {
                    seconds: self.config.fetch_timeout.as_secs(),
                })),
            };

            match result {
                Ok(page) => return Ok(page),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    *retries += 1;
                    log::warn!(
                        "{}/{}: {e}, retrying in {:?} ({attempt}/{})",
                        handle.owner(),
                        handle.name(),
                        self.config.retry_delay,
                        self.config.max_retries
                    );

                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => return Err(ProviderError::Cancelled),
                        () = tokio::time::sleep(self.config.retry_delay) => {}
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn scan_page(&self, repo_name: &str, page: &ChangesetPage, anchor: &Cursor) -> PageScan {
        let window = &self.config.window;
        let mut commits = Vec::new();
        let mut oldest = None;

        for changeset in page.oldest_first() {
            let class = Classification::of(changeset, anchor, window);
            log::trace!(
                "node: {}, ts = {}, class = {class:?}",
                changeset.node,
                changeset.timestamp
            );

            if class == Classification::Anchor {
                continue;
            }
            oldest.get_or_insert(class);

            if class == Classification::InWindow {
                commits.push(Commit::from_changeset(
                    repo_name,
                    changeset,
                    self.config.truncate_length,
                ));
            }
        }

        let decision = match oldest {
            None => PageDecision::Exhausted,
            Some(class) if class.needs_older_pages() => PageDecision::Continue,
            Some(_) => PageDecision::Stop,
        };

        PageScan { commits, decision }
    }
}
