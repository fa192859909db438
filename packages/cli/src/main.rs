#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use baseline_cli::Cli;
use baseline_resolver::CancellationToken;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let cancel = CancellationToken::new();

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("[CTRL + C] cancelling, partial results follow");
                cancel.cancel();
            }
        });
    }

    let started = std::time::Instant::now();
    let out = baseline_cli::open_output(&cli)?;
    let result = baseline_cli::run(&cli, &cancel, out).await;
    log::info!("Finished in {:.3}s.", started.elapsed().as_secs_f64());

    if cancel.is_cancelled() {
        std::process::exit(2);
    }

    result.map(|_| ())
}
