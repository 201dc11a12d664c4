//! Read service entrypoint: serves stored draws as JSON, XML or plain text.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use euromillions::cli::ApiArgs;
use euromillions::metrics::Metrics;
use euromillions::{api, logging, SqliteStore};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let args = ApiArgs::parse();
    if let Err(e) = logging::init(args.verbose, args.log_file.as_deref()) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    match serve(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "read service stopped");
            ExitCode::FAILURE
        }
    }
}

async fn serve(args: ApiArgs) -> anyhow::Result<()> {
    let store = SqliteStore::open_existing(&args.db)
        .with_context(|| format!("opening database {}", args.db.display()))?;
    let metrics = Metrics::init()?;

    let app = api::router(api::AppState::new(Arc::new(store))).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    tracing::info!(addr = %args.bind, db = %args.db.display(), "read service listening");
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
