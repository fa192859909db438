use std::{path::PathBuf, time::Duration};

use baseline_bitbucket::DEFAULT_BASE_URL;
use baseline_provider::DateWindow;
use baseline_resolver::{ResolverConfig, ScanConfig};
use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;

/// A date given on the command line could not be read.
#[derive(Debug, thiserror::Error)]
#[error("invalid date '{input}': expected DD/MM/YYYY or DD/MM/YYYY HH:MM:SS")]
pub struct ReportDateError {
    input: String,
}

/// Parse `DD/MM/YYYY` (midnight) or `DD/MM/YYYY HH:MM:SS`, as UTC.
///
/// # Errors
///
/// * If the input matches neither layout.
pub fn parse_report_date(input: &str) -> Result<NaiveDateTime, ReportDateError> {
    let input = input.trim();

    NaiveDateTime::parse_from_str(input, "%d/%m/%Y %H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(input, "%d/%m/%Y").map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|_| ReportDateError {
            input: input.to_string(),
        })
}

#[derive(Debug, Parser)]
#[command(name = "baseline")]
#[command(about = "Report the Bitbucket changesets of every accessible repository within a date window", long_about = None)]
pub struct Cli {
    #[arg(short, long, env = "BITBUCKET_USERNAME")]
    pub username: String,

    #[arg(short, long, env = "BITBUCKET_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// First day of the window, inclusive [default: one month ago]
    #[arg(long, value_parser = parse_report_date)]
    pub from: Option<NaiveDateTime>,

    /// End of the window, exclusive [default: tomorrow, so today is included]
    #[arg(long, value_parser = parse_report_date)]
    pub to: Option<NaiveDateTime>,

    /// Only repositories whose name starts with this, ignoring case
    #[arg(long)]
    pub prefix: Option<String>,

    /// Also list repositories with no commits in the window
    #[arg(long)]
    pub show_empty: bool,

    /// Cut commit messages to this many characters, 0 to keep them whole
    #[arg(long, default_value_t = 0)]
    pub truncate: usize,

    /// Changesets requested per page, at least 2
    #[arg(
        long,
        default_value_t = baseline_resolver::config::DEFAULT_PAGE_SIZE,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(2..)
    )]
    pub page_size: usize,

    /// Repositories resolved at the same time
    #[arg(long, default_value_t = baseline_resolver::config::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Retries per page after a malformed response or timeout
    #[arg(long, default_value_t = baseline_resolver::config::DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    #[arg(long, default_value_t = 3)]
    pub retry_delay_secs: u64,

    #[arg(long, default_value_t = 30)]
    pub fetch_timeout_secs: u64,

    #[arg(long, env = "BITBUCKET_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// The window `[from, to)`, with defaults relative to `today`.
    #[must_use]
    pub fn window(&self, today: NaiveDate) -> DateWindow {
        let from = self.from.unwrap_or_else(|| {
            today
                .checked_sub_months(Months::new(1))
                .unwrap_or(today)
                .and_time(NaiveTime::MIN)
        });
        let to = self.to.unwrap_or_else(|| {
            today
                .succ_opt()
                .unwrap_or(today)
                .and_time(NaiveTime::MIN)
        });

        DateWindow::new(from.and_utc(), to.and_utc())
    }

    #[must_use]
    pub fn scan_config(&self, today: NaiveDate) -> ScanConfig {
        let resolver = ResolverConfig::new(self.window(today))
            .with_page_size(self.page_size)
            .with_truncate_length(self.truncate)
            .with_max_retries(self.max_retries)
            .with_retry_delay(Duration::from_secs(self.retry_delay_secs))
            .with_fetch_timeout(Duration::from_secs(self.fetch_timeout_secs));

        ScanConfig::new(resolver)
            .with_prefix(self.prefix.clone())
            .with_show_empty(self.show_empty)
            .with_concurrency(self.concurrency)
    }
}
