#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Provider traits for `Baseline`.
//!
//! `SourceProvider` lists repositories and opens them; `RepositoryHandle`
//! pages through one repository's changeset history. The Bitbucket client
//! and the in-memory test provider both implement these.

mod provider;

pub use baseline_models::*;
pub use provider::{RepositoryHandle, SourceProvider};
