// src/ingest/mod.rs
pub mod config;
pub mod dates;
pub mod fetch;
pub mod providers;
pub mod types;
pub mod validate;

use std::time::Duration;

use chrono::NaiveDate;
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use tracing::Instrument;

use crate::draw::DrawRecord;
use crate::error::IngestError;
use crate::ingest::fetch::Fetcher;
use crate::ingest::types::{SiteSelection, SourceId};
use crate::store::PersistenceGateway;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_attempts_total", "Per-source ingestion attempts.");
        describe_counter!("ingest_persisted_total", "Draws appended to storage.");
        describe_counter!(
            "ingest_skipped_total",
            "Attempts resolved without a write (same or stale date)."
        );
        describe_counter!(
            "ingest_source_errors_total",
            "Attempts that failed, by coordinator stage."
        );
        describe_histogram!("ingest_fetch_ms", "Source fetch time in milliseconds.");
    });
}

/// Where an extracted date stands against the freshness cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    New,
    Same,
    Stale,
}

/// Chronological comparison; an empty store makes everything new.
pub fn freshness(latest: Option<NaiveDate>, candidate: NaiveDate) -> Freshness {
    match latest {
        None => Freshness::New,
        Some(l) if candidate > l => Freshness::New,
        Some(l) if candidate == l => Freshness::Same,
        Some(_) => Freshness::Stale,
    }
}

/// Non-error result of one source attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Persisted(DrawRecord),
    /// The source has nothing newer than storage.
    SkipSame(NaiveDate),
    /// The source lags behind storage; never written.
    SkipStale { found: NaiveDate, latest: NaiveDate },
}

#[derive(Debug)]
pub struct SourceAttempt {
    pub source: SourceId,
    pub result: Result<Outcome, IngestError>,
}

/// Per-source results of one run, in run order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub attempts: Vec<SourceAttempt>,
}

impl RunReport {
    pub fn persisted(&self) -> usize {
        self.count(|r| matches!(r, Ok(Outcome::Persisted(_))))
    }

    pub fn same(&self) -> usize {
        self.count(|r| matches!(r, Ok(Outcome::SkipSame(_))))
    }

    pub fn stale(&self) -> usize {
        self.count(|r| matches!(r, Ok(Outcome::SkipStale { .. })))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| r.is_err())
    }

    fn count(&self, pred: impl Fn(&Result<Outcome, IngestError>) -> bool) -> usize {
        self.attempts.iter().filter(|a| pred(&a.result)).count()
    }
}

/// Drives fetch → extract → validate → compare → persist for each selected
/// source, strictly one after another.
pub struct Coordinator<F, G> {
    fetcher: F,
    gateway: G,
    politeness_delay: Duration,
}

impl<F: Fetcher, G: PersistenceGateway> Coordinator<F, G> {
    pub fn new(fetcher: F, gateway: G) -> Self {
        Self {
            fetcher,
            gateway,
            politeness_delay: Duration::from_millis(config::DEFAULT_POLITENESS_DELAY_MS),
        }
    }

    pub fn with_politeness_delay(mut self, delay: Duration) -> Self {
        self.politeness_delay = delay;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Run the selection.
    ///
    /// A single source surfaces its error. "All" logs each failure, pauses
    /// between sources and always returns the full report.
    pub async fn run(&self, selection: SiteSelection) -> Result<RunReport, IngestError> {
        match selection {
            SiteSelection::One(id) => {
                let outcome = self.ingest_source(id).await?;
                Ok(RunReport {
                    attempts: vec![SourceAttempt {
                        source: id,
                        result: Ok(outcome),
                    }],
                })
            }
            SiteSelection::All => {
                let mut report = RunReport::default();
                for (i, id) in selection.sources().into_iter().enumerate() {
                    if i > 0 && !self.politeness_delay.is_zero() {
                        tokio::time::sleep(self.politeness_delay).await;
                    }
                    let result = self.ingest_source(id).await;
                    if let Err(e) = &result {
                        tracing::error!(
                            source = %id,
                            stage = %e.stage(),
                            error = %e,
                            "source failed, continuing"
                        );
                    }
                    report.attempts.push(SourceAttempt { source: id, result });
                }
                Ok(report)
            }
        }
    }

    /// One attempt against one source.
    pub async fn ingest_source(&self, id: SourceId) -> Result<Outcome, IngestError> {
        ensure_metrics_described();
        let descriptor = id.descriptor();
        let span = tracing::info_span!("source", id = %id, name = descriptor.name);

        async move {
            counter!("ingest_attempts_total", "source" => id.label()).increment(1);
            let res = self.attempt(id).await;
            match &res {
                Ok(Outcome::Persisted(r)) => {
                    counter!("ingest_persisted_total", "source" => id.label()).increment(1);
                    tracing::info!(draw = %r, "new draw persisted");
                }
                Ok(Outcome::SkipSame(d)) => {
                    counter!("ingest_skipped_total", "source" => id.label(), "reason" => "same")
                        .increment(1);
                    tracing::info!(date = %d, "date unchanged, nothing to do");
                }
                Ok(Outcome::SkipStale { found, latest }) => {
                    counter!("ingest_skipped_total", "source" => id.label(), "reason" => "stale")
                        .increment(1);
                    tracing::warn!(%found, %latest, "source is behind stored history, skipped");
                }
                Err(e) => {
                    counter!(
                        "ingest_source_errors_total",
                        "source" => id.label(),
                        "stage" => e.stage().as_str()
                    )
                    .increment(1);
                }
            }
            res
        }
        .instrument(span)
        .await
    }

    async fn attempt(&self, id: SourceId) -> Result<Outcome, IngestError> {
        let descriptor = id.descriptor();
        tracing::debug!(endpoint = descriptor.endpoint, "fetching");
        let raw = self.fetcher.fetch(descriptor).await?;

        let extracted = id.extract(&raw)?;
        drop(raw);

        let record = validate::validate(&extracted)?;

        // Re-read every attempt: an earlier source in this run may have advanced it.
        let latest = self.gateway.latest_date().map_err(IngestError::Cursor)?;
        tracing::debug!(latest = ?latest, candidate = %record.date(), "comparing dates");

        match freshness(latest, record.date()) {
            Freshness::Same => Ok(Outcome::SkipSame(record.date())),
            Freshness::Stale => Ok(Outcome::SkipStale {
                found: record.date(),
                latest: latest.unwrap_or(record.date()),
            }),
            Freshness::New => {
                self.gateway
                    .insert_draw(&record)
                    .map_err(IngestError::Persistence)?;
                Ok(Outcome::Persisted(record))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn freshness_three_way() {
        assert_eq!(freshness(None, d(2024, 1, 22)), Freshness::New);
        assert_eq!(freshness(Some(d(2024, 1, 15)), d(2024, 1, 22)), Freshness::New);
        assert_eq!(freshness(Some(d(2024, 1, 22)), d(2024, 1, 22)), Freshness::Same);
        assert_eq!(freshness(Some(d(2024, 1, 22)), d(2024, 1, 19)), Freshness::Stale);
    }

    #[test]
    fn freshness_crosses_year_boundaries() {
        assert_eq!(freshness(Some(d(2023, 12, 29)), d(2024, 1, 2)), Freshness::New);
        assert_eq!(freshness(Some(d(2024, 1, 2)), d(2023, 12, 29)), Freshness::Stale);
    }

    #[test]
    fn report_counts_by_outcome() {
        let report = RunReport {
            attempts: vec![
                SourceAttempt {
                    source: SourceId::EuromilhoesLatest,
                    result: Ok(Outcome::SkipSame(d(2024, 1, 22))),
                },
                SourceAttempt {
                    source: SourceId::SantaCasa,
                    result: Err(IngestError::Fetch(crate::error::FetchError::MissingFixture(
                        SourceId::SantaCasa,
                    ))),
                },
            ],
        };
        assert_eq!(report.same(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.persisted() + report.stale(), 0);
    }
}
