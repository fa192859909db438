//! Pure predicates applied to repositories and commits.

use baseline_provider::{DateWindow, RepositorySummary};
use chrono::{DateTime, Utc};

/// `true` iff `window.from <= timestamp < window.to`.
#[must_use]
pub fn in_window(timestamp: DateTime<Utc>, window: &DateWindow) -> bool {
    window.contains(timestamp)
}

/// Repository-level check: only `from` matters, and it is strict.
#[must_use]
pub fn updated_since(repository: &RepositorySummary, window: &DateWindow) -> bool {
    repository.last_updated > window.from
}

/// Case-insensitive prefix match on the first `prefix.len()` characters.
///
/// An absent or empty prefix matches everything. A name shorter than the
/// prefix never matches.
#[must_use]
pub fn matches_prefix(name: &str, prefix: Option<&str>) -> bool {
    let Some(prefix) = prefix.filter(|p| !p.is_empty()) else {
        return true;
    };

    let wanted = prefix.chars().count();
    let head: String = name.chars().take(wanted).collect();

    head.chars().count() == wanted && head.to_lowercase() == prefix.to_lowercase()
}
