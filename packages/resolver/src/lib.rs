#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Commit-window resolution for `Baseline`.
//!
//! The [`CommitWindowResolver`] walks one repository's changeset history a
//! page at a time, newest to oldest, and keeps the commits that fall in a
//! [`DateWindow`](baseline_provider::DateWindow). The [`Scanner`] runs it over
//! every accessible repository that passes the date and prefix filters.

pub mod config;
pub mod filter;
pub mod resolver;
pub mod scanner;

pub use config::{ResolverConfig, ScanConfig};
pub use filter::{in_window, matches_prefix, updated_since};
pub use resolver::{Classification, CommitWindowResolver, ResolveOutcome};
pub use scanner::{ScanError, Scanner};
pub use tokio_util::sync::CancellationToken;
