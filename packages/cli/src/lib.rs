#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod args;

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    sync::Arc,
    time::Duration,
};

use baseline_bitbucket::BitbucketProvider;
use baseline_provider::ScanSummary;
use baseline_report::ReportWriter;
use baseline_resolver::{CancellationToken, Scanner};

pub use args::{Cli, ReportDateError, parse_report_date};

/// Open the report destination chosen on the command line.
///
/// # Errors
///
/// * If the output file cannot be created.
pub fn open_output(cli: &Cli) -> anyhow::Result<Box<dyn Write + Send>> {
    Ok(match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    })
}

/// Scan every repository and write the report to `out`.
///
/// # Errors
///
/// * If the repository listing fails (bad credentials, no network).
/// * If the report cannot be written.
pub async fn run<W: Write>(
    cli: &Cli,
    cancel: &CancellationToken,
    out: W,
) -> anyhow::Result<ScanSummary> {
    let config = cli.scan_config(chrono::Utc::now().date_naive());
    let window = config.window();

    log::info!("Generating changeset baseline...");
    log::info!("Configuration:");
    log::info!(" * user: {}", cli.username);
    log::info!(" * from: {}", window.from.format("%d/%m/%Y %H:%M:%S"));
    log::info!(" * to: {}", window.to.format("%d/%m/%Y %H:%M:%S"));
    log::info!(" * prefix: {}", config.prefix.as_deref().unwrap_or(""));
    log::info!(" * show empty: {}", config.show_empty);
    log::info!(" * truncate: {}", config.resolver.truncate_length);

    if window.is_empty() {
        log::warn!("The date window is empty, no commits will be reported");
    }

    let provider = BitbucketProvider::new()
        .with_credentials(cli.username.clone(), cli.password.clone())
        .with_base_url(cli.base_url.clone())
        .with_timeout(Duration::from_secs(cli.fetch_timeout_secs));

    let scanner = Scanner::new(Arc::new(provider), config);
    let summary = scanner.run(cancel).await.inspect_err(|_| {
        log::warn!("Please check your username, password and internet connection.");
    })?;

    let mut writer = ReportWriter::new(out);
    writer.write_summary(&summary)?;

    if summary.failed_count() > 0 {
        log::warn!("{} repositories reported errors", summary.failed_count());
    }

    Ok(summary)
}
