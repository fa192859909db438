#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Report output for `Baseline`.
//!
//! Each repository becomes a header line, an optional error line and one
//! pipe-delimited line per commit:
//!
//! ```text
//! owner|repoName|branch|fullHash|shortDate|rawAuthor|message|
//! ```
//!
//! Downstream tooling splits these lines on `|`, so field order and the
//! trailing delimiter are fixed.

use std::io::{self, Write};

use baseline_models::{Commit, RepositoryReport, ScanSummary};

pub const DELIMITER: char = '|';

#[must_use]
pub fn format_header(report: &RepositoryReport) -> String {
    format!(
        "=== Repo: {}/{}, Commits: {} ===",
        report.owner,
        report.name,
        report.commits.len()
    )
}

#[must_use]
pub fn format_commit_line(owner: &str, commit: &Commit) -> String {
    let short_date = commit.short_date();
    let fields: [&str; 7] = [
        owner,
        &commit.repo_name,
        commit.branch.as_deref().unwrap_or_default(),
        &commit.full_hash,
        &short_date,
        &commit.raw_author,
        &commit.message,
    ];

    let mut line = String::new();
    for field in fields {
        line.push_str(field);
        line.push(DELIMITER);
    }
    line
}

pub struct ReportWriter<W: Write> {
    out: W,
}

impl<W: Write> ReportWriter<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Write one repository block followed by a blank line.
    ///
    /// # Errors
    ///
    /// * If writing to the underlying sink fails.
    pub fn write_repository(&mut self, report: &RepositoryReport) -> io::Result<()> {
        writeln!(self.out, "{}", format_header(report))?;

        if let Some(error) = &report.error {
            writeln!(self.out, "  ERROR: {error}")?;
        }

        for commit in &report.commits {
            writeln!(self.out, "{}", format_commit_line(&report.owner, commit))?;
        }

        writeln!(self.out)
    }

    /// Write every repository block and a closing totals line.
    ///
    /// # Errors
    ///
    /// * If writing to the underlying sink fails.
    pub fn write_summary(&mut self, summary: &ScanSummary) -> io::Result<()> {
        for report in &summary.reports {
            self.write_repository(report)?;
        }

        writeln!(
            self.out,
            "Repositories: {} listed, {} matched, {} reported; commits: {}",
            summary.total_repositories,
            summary.matched_repositories,
            summary.reports.len(),
            summary.commit_count()
        )?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
