// src/cli.rs
//! Command-line surfaces of the updater and the read service.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::ingest::types::SiteSelection;

/// Fetch the latest EuroMillions draw and append it when it is new.
#[derive(Debug, Parser)]
#[command(name = "euromillions-update", version)]
pub struct UpdaterArgs {
    /// SQLite database file (created if missing)
    #[arg(short = 'd', long = "database")]
    pub database: PathBuf,

    /// Source to query: 1-5, or "all" to try each in turn
    #[arg(short = 's', long = "site")]
    pub site: SiteSelection,

    /// Debug-level logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Append logs to this file instead of stderr
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

/// Serve stored draws over HTTP.
#[derive(Debug, Parser)]
#[command(name = "euromillions-api", version)]
pub struct ApiArgs {
    #[arg(short = 'd', long = "db", default_value = "./euromillions.db")]
    pub db: PathBuf,

    #[arg(long, default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    #[arg(long)]
    pub verbose: bool,

    #[arg(short = 'l', long = "log-file")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::SourceId;

    #[test]
    fn updater_requires_database_and_site() {
        assert!(UpdaterArgs::try_parse_from(["euromillions-update", "-s", "1"]).is_err());
        assert!(UpdaterArgs::try_parse_from(["euromillions-update", "-d", "x.db"]).is_err());
    }

    #[test]
    fn updater_parses_site_selection() {
        let a = UpdaterArgs::try_parse_from([
            "euromillions-update",
            "-d",
            "x.db",
            "-s",
            "ALL",
            "-v",
        ])
        .unwrap();
        assert_eq!(a.site, SiteSelection::All);
        assert!(a.verbose);
        let b = UpdaterArgs::try_parse_from([
            "euromillions-update",
            "--database",
            "x.db",
            "--site",
            "3",
        ])
        .unwrap();
        assert_eq!(b.site, SiteSelection::One(SourceId::SantaCasa));
        let bad = UpdaterArgs::try_parse_from(["euromillions-update", "-d", "x.db", "-s", "6"]);
        assert!(bad.is_err());
    }

    #[test]
    fn api_defaults() {
        let a = ApiArgs::try_parse_from(["euromillions-api"]).unwrap();
        assert_eq!(a.db, PathBuf::from("./euromillions.db"));
        assert_eq!(a.bind.port(), 8080);
        assert!(a.log_file.is_none());
    }
}
