//! Updater entrypoint: fetch one source (or all of them in turn) and append the
//! draw when it is newer than what the database already holds.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use euromillions::cli::UpdaterArgs;
use euromillions::ingest::config::IngestConfig;
use euromillions::ingest::fetch::HttpFetcher;
use euromillions::ingest::{Coordinator, RunReport};
use euromillions::metrics::Metrics;
use euromillions::{logging, SiteSelection, SqliteStore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let args = UpdaterArgs::parse();
    if let Err(e) = logging::init(args.verbose, args.output.as_deref()) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    match run(&args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "update aborted");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &UpdaterArgs) -> anyhow::Result<ExitCode> {
    let metrics = Metrics::init()?;
    let cfg = IngestConfig::load_default().context("loading ingest config")?;
    let fetcher = HttpFetcher::from_config(&cfg).context("building HTTP client")?;
    let store = SqliteStore::open(&args.database)
        .with_context(|| format!("opening database {}", args.database.display()))?;

    tracing::info!(database = %args.database.display(), site = ?args.site, "update started");
    let coordinator =
        Coordinator::new(fetcher, store).with_politeness_delay(cfg.politeness_delay());

    let code = match coordinator.run(args.site).await {
        Ok(report) => {
            log_summary(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            // Only single-source runs surface an error.
            if let SiteSelection::One(id) = args.site {
                tracing::error!(source = %id, stage = %e.stage(), error = %e, "update failed");
            }
            ExitCode::FAILURE
        }
    };
    tracing::info!(series = %metrics.series("ingest_").join("; "), "run metrics");
    Ok(code)
}

fn log_summary(report: &RunReport) {
    tracing::info!(
        persisted = report.persisted(),
        same = report.same(),
        stale = report.stale(),
        failed = report.failed(),
        "update finished"
    );
}
