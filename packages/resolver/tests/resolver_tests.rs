use std::time::Duration;

use baseline_provider::{Cursor, DateWindow, ProviderError};
use baseline_resolver::{CancellationToken, CommitWindowResolver, ResolverConfig};
use baseline_testing::{MockRepository, changeset};
use chrono::{DateTime, TimeZone, Utc};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
}

/// One changeset per day, `1..=days`, seeded with the day number.
fn daily_history(days: u32) -> Vec<baseline_provider::RawChangeset> {
    (1..=days)
        .map(|d| changeset(u64::from(d), day(d), &format!("change {d}")))
        .collect()
}

fn repository(days: u32) -> MockRepository {
    MockRepository::new("acme", "core", day(days)).with_history(daily_history(days))
}

fn messages(commits: &[baseline_provider::Commit]) -> Vec<&str> {
    commits.iter().map(|c| c.message.as_str()).collect()
}

#[tokio::test]
async fn test_window_excludes_upper_bound() {
    let repo = repository(3);
    let resolver =
        CommitWindowResolver::new(ResolverConfig::new(DateWindow::new(day(1), day(3))));

    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert!(outcome.error.is_none());
    assert_eq!(messages(&outcome.commits), vec!["change 1", "change 2"]);
}

#[tokio::test]
async fn test_window_spanning_many_pages() {
    let repo = repository(10);
    let resolver = CommitWindowResolver::new(
        ResolverConfig::new(DateWindow::new(day(3), day(8))).with_page_size(3),
    );

    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert!(outcome.error.is_none());
    assert_eq!(
        messages(&outcome.commits),
        vec!["change 3", "change 4", "change 5", "change 6", "change 7"]
    );

    let requests = repo.history().requests().await;
    assert_eq!(requests[0], Cursor::Head);
    assert_eq!(requests.len(), outcome.pages_fetched as usize);
    for pair in requests.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[tokio::test]
async fn test_smallest_page_size_walks_every_page() {
    let repo = repository(5);
    let resolver = CommitWindowResolver::new(
        ResolverConfig::new(DateWindow::new(day(1), day(6))).with_page_size(1),
    );

    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert!(outcome.error.is_none());
    assert_eq!(
        messages(&outcome.commits),
        vec!["change 1", "change 2", "change 3", "change 4", "change 5"]
    );
    assert_eq!(outcome.pages_fetched, 5);
}

#[tokio::test]
async fn test_window_after_newest_commit_needs_one_page() {
    let repo = repository(5);
    let resolver = CommitWindowResolver::new(
        ResolverConfig::new(DateWindow::new(day(10), day(20))).with_page_size(2),
    );

    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert!(outcome.commits.is_empty());
    assert!(outcome.error.is_none());
    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(repo.history().fetch_count().await, 1);
}

#[tokio::test]
async fn test_window_before_root_walks_whole_history() {
    let repo = repository(20);
    let window = DateWindow::new(
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap(),
    );
    let resolver = CommitWindowResolver::new(ResolverConfig::new(window).with_page_size(5));

    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert!(outcome.commits.is_empty());
    assert!(outcome.error.is_none());
    assert_eq!(outcome.pages_fetched, 5);
}

#[tokio::test]
async fn test_history_ending_on_full_page_stops_at_terminal_anchor() {
    // 3 changesets, page size 3: the second request returns only the anchor.
    let repo = repository(3);
    let window = DateWindow::new(
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        day(3),
    );
    let resolver = CommitWindowResolver::new(ResolverConfig::new(window).with_page_size(3));

    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert_eq!(messages(&outcome.commits), vec!["change 1", "change 2"]);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(
        repo.history().requests().await[1],
        Cursor::Hash(format!("{:040x}", 1))
    );
}

#[tokio::test]
async fn test_empty_window_yields_nothing() {
    let repo = repository(5);
    let resolver =
        CommitWindowResolver::new(ResolverConfig::new(DateWindow::new(day(3), day(3))));

    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert!(outcome.commits.is_empty());
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn test_empty_repository() {
    let repo = MockRepository::new("acme", "core", day(1));
    let resolver =
        CommitWindowResolver::new(ResolverConfig::new(DateWindow::new(day(1), day(9))));

    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert!(outcome.commits.is_empty());
    assert_eq!(outcome.pages_fetched, 1);
}

#[tokio::test]
async fn test_resolving_twice_is_idempotent() {
    let repo = repository(12);
    let resolver = CommitWindowResolver::new(
        ResolverConfig::new(DateWindow::new(day(2), day(11))).with_page_size(4),
    );
    let cancel = CancellationToken::new();

    let first = resolver.resolve(&repo.handle(), &cancel).await;
    let second = resolver.resolve(&repo.handle(), &cancel).await;

    assert_eq!(first.commits, second.commits);
    assert_eq!(first.pages_fetched, second.pages_fetched);
    assert_eq!(first.commits.len(), 9);
}

#[tokio::test]
async fn test_messages_are_truncated() {
    let repo = MockRepository::new("acme", "core", day(2))
        .with_history(vec![changeset(1, day(1), "hello world")]);
    let resolver = CommitWindowResolver::new(
        ResolverConfig::new(DateWindow::new(day(1), day(2))).with_truncate_length(5),
    );

    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert_eq!(messages(&outcome.commits), vec!["hello"]);
    assert_eq!(outcome.commits[0].repo_name, "core");
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_parse_errors_are_retried_after_delay() {
    let repo = repository(3).with_failures(vec![
        ProviderError::parse("unexpected end of input"),
        ProviderError::parse("unexpected end of input"),
    ]);
    let resolver =
        CommitWindowResolver::new(ResolverConfig::new(DateWindow::new(day(1), day(3))));

    let started = tokio::time::Instant::now();
    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert!(outcome.error.is_none());
    assert_eq!(outcome.retries, 2);
    assert_eq!(messages(&outcome.commits), vec!["change 1", "change 2"]);
    assert!(started.elapsed() >= Duration::from_secs(6));
    assert_eq!(repo.history().fetch_count().await, 3);
}

#[tokio::test(start_paused = true)]
async fn test_retries_are_bounded() {
    let repo = repository(3).with_failures(vec![ProviderError::parse("garbled"); 10]);
    let resolver = CommitWindowResolver::new(
        ResolverConfig::new(DateWindow::new(day(1), day(3))).with_max_retries(3),
    );

    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert_eq!(outcome.retries, 3);
    assert!(matches!(outcome.error, Some(ProviderError::Parse { .. })));
    assert!(outcome.commits.is_empty());
    assert_eq!(repo.history().fetch_count().await, 4);
}

#[tokio::test]
async fn test_network_error_returns_partial_result() {
    let repo = repository(10).with_failures_after(1, vec![ProviderError::network("reset")]);
    let resolver = CommitWindowResolver::new(
        ResolverConfig::new(DateWindow::new(day(1), day(11))).with_page_size(4),
    );

    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert_eq!(outcome.retries, 0);
    assert!(matches!(outcome.error, Some(ProviderError::Network { .. })));
    assert_eq!(
        messages(&outcome.commits),
        vec!["change 7", "change 8", "change 9", "change 10"]
    );
    assert_eq!(repo.history().fetch_count().await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_slow_fetch_times_out_and_is_retried() {
    let repo = repository(3).with_fetch_delay(Duration::from_secs(60));
    let resolver = CommitWindowResolver::new(
        ResolverConfig::new(DateWindow::new(day(1), day(3)))
            .with_fetch_timeout(Duration::from_secs(10))
            .with_max_retries(1),
    );

    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert_eq!(outcome.retries, 1);
    assert_eq!(outcome.error, Some(ProviderError::Timeout { seconds: 10 }));
    assert_eq!(repo.history().fetch_count().await, 2);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let repo = repository(3);
    let resolver =
        CommitWindowResolver::new(ResolverConfig::new(DateWindow::new(day(1), day(3))));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = resolver.resolve(&repo.handle(), &cancel).await;

    assert_eq!(outcome.error, Some(ProviderError::Cancelled));
    assert_eq!(outcome.pages_fetched, 0);
    assert_eq!(repo.history().fetch_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_interrupts_retry_delay() {
    let repo = repository(3).with_failures(vec![ProviderError::parse("garbled")]);
    let resolver = CommitWindowResolver::new(
        ResolverConfig::new(DateWindow::new(day(1), day(3)))
            .with_retry_delay(Duration::from_secs(3600)),
    );
    let cancel = CancellationToken::new();

    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            cancel.cancel();
        })
    };

    let started = tokio::time::Instant::now();
    let outcome = resolver.resolve(&repo.handle(), &cancel).await;
    canceller.await.unwrap();

    assert_eq!(outcome.error, Some(ProviderError::Cancelled));
    assert_eq!(outcome.retries, 1);
    assert!(started.elapsed() < Duration::from_secs(3600));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_interrupts_pending_fetch() {
    let repo = repository(3).with_fetch_delay(Duration::from_secs(20));
    let resolver =
        CommitWindowResolver::new(ResolverConfig::new(DateWindow::new(day(1), day(4))));
    let cancel = CancellationToken::new();

    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            cancel.cancel();
        })
    };

    let started = tokio::time::Instant::now();
    let outcome = resolver.resolve(&repo.handle(), &cancel).await;
    canceller.await.unwrap();

    assert_eq!(outcome.error, Some(ProviderError::Cancelled));
    assert_eq!(outcome.retries, 0);
    assert_eq!(outcome.pages_fetched, 0);
    assert!(outcome.commits.is_empty());
    assert!(started.elapsed() < Duration::from_secs(20));
    assert_eq!(repo.history().fetch_count().await, 1);
}

#[tokio::test]
async fn test_resume_from_explicit_cursor() {
    let repo = repository(6);
    let resolver = CommitWindowResolver::new(
        ResolverConfig::new(DateWindow::new(day(1), day(7)))
            .with_start(Cursor::Hash(format!("{:040x}", 4))),
    );

    let outcome = resolver
        .resolve(&repo.handle(), &CancellationToken::new())
        .await;

    assert_eq!(
        messages(&outcome.commits),
        vec!["change 1", "change 2", "change 3"]
    );
}
