// src/logging.rs
//! Tracing setup shared by both binaries.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// Binaries log under their own crate names.
const DEFAULT_FILTER: &str =
    "euromillions=info,euromillions_update=info,euromillions_api=info,warn";
const VERBOSE_FILTER: &str =
    "euromillions=debug,euromillions_update=debug,euromillions_api=debug,warn";

/// Pick the filter: `RUST_LOG` wins, otherwise the verbosity flag decides.
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
    })
}

/// Install the global subscriber, writing to stderr or appending to `log_file`.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let registry = tracing_subscriber::registry().with(filter(verbose));
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
        }
        None => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    }
    .map_err(|e| anyhow!("tracing init failed: {e}"))
}
