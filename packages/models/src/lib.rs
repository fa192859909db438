#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Shared models for `Baseline`.
//!
//! These types sit between the hosting-service clients, the commit-window
//! resolver and the report writer. None of them know how they were fetched.

pub mod changeset;
pub mod commit;
pub mod error;
pub mod report;
pub mod repository;
pub mod window;

pub use changeset::{ChangesetPage, Cursor, RawChangeset};
pub use commit::Commit;
pub use error::ProviderError;
pub use report::{RepositoryReport, ScanSummary};
pub use repository::RepositorySummary;
pub use window::DateWindow;
