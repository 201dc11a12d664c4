//! Error taxonomy for one ingestion attempt.
//!
//! Every failure while processing a single source is captured as an
//! [`IngestError`]; the coordinator decides whether it ends the run
//! (single-source mode) or is logged and skipped ("all" mode).

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::ingest::dates::DateFormat;
use crate::ingest::types::SourceId;

/// Network-level failure while fetching a source payload.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no fixture registered for source {0}")]
    MissingFixture(SourceId),
}

/// Where inside a source recipe extraction gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractStage {
    LocateDate,
    ParseDate,
    LocateNumbers,
    CountNumbers,
}

impl ExtractStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractStage::LocateDate => "locate-date",
            ExtractStage::ParseDate => "parse-date",
            ExtractStage::LocateNumbers => "locate-numbers",
            ExtractStage::CountNumbers => "count-numbers",
        }
    }
}

impl fmt::Display for ExtractStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A date string that does not match its source's format exactly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("date {input:?} does not match {format}")]
pub struct DateParseError {
    pub input: String,
    pub format: DateFormat,
}

/// Structural mismatch between a payload and the recipe of its source.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("{stage}: {reason}")]
    Structure { stage: ExtractStage, reason: String },

    #[error("parse-date: {0}")]
    Date(#[from] DateParseError),
}

impl ExtractError {
    pub fn locate_date(reason: impl Into<String>) -> Self {
        Self::Structure {
            stage: ExtractStage::LocateDate,
            reason: reason.into(),
        }
    }

    pub fn locate_numbers(reason: impl Into<String>) -> Self {
        Self::Structure {
            stage: ExtractStage::LocateNumbers,
            reason: reason.into(),
        }
    }

    pub fn count_numbers(reason: impl Into<String>) -> Self {
        Self::Structure {
            stage: ExtractStage::CountNumbers,
            reason: reason.into(),
        }
    }

    pub fn stage(&self) -> ExtractStage {
        match self {
            ExtractError::Structure { stage, .. } => *stage,
            ExtractError::Date(_) => ExtractStage::ParseDate,
        }
    }
}

/// Which token group a count check applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberGroup {
    /// Flat list of 5 main + 2 star tokens, split by position.
    Combined,
    Main,
    Stars,
}

impl fmt::Display for NumberGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NumberGroup::Combined => "combined",
            NumberGroup::Main => "main",
            NumberGroup::Stars => "stars",
        })
    }
}

/// Token list rejected before being split into main/star numbers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("too few {group} numbers: expected {expected}, found {found}")]
    TooFew {
        group: NumberGroup,
        expected: usize,
        found: usize,
    },

    #[error("too many {group} numbers: expected {expected}, found {found}")]
    TooMany {
        group: NumberGroup,
        expected: usize,
        found: usize,
    },

    #[error("token {token:?} at position {position} is not an integer")]
    NonNumeric { token: String, position: usize },
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("a draw dated {0} is already stored")]
    DuplicateDate(NaiveDate),

    #[error("database file not found at {0}")]
    MissingDatabase(PathBuf),

    #[error("unexpected schema: {0}")]
    Schema(String),

    #[error("stored date {0:?} is not a canonical YYYY-MM-DD date")]
    CorruptDate(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Coordinator state in which an attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Extracting,
    Validating,
    ComparingDate,
    Persisting,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Validating => "validating",
            Stage::ComparingDate => "comparing-date",
            Stage::Persisting => "persisting",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of one per-source attempt.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("extraction failed at {0}")]
    Extract(#[from] ExtractError),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("reading latest stored date failed: {0}")]
    Cursor(#[source] PersistenceError),

    #[error("persisting draw failed: {0}")]
    Persistence(#[source] PersistenceError),
}

impl IngestError {
    pub fn stage(&self) -> Stage {
        match self {
            IngestError::Fetch(_) => Stage::Fetching,
            IngestError::Extract(_) => Stage::Extracting,
            IngestError::Validation(_) => Stage::Validating,
            IngestError::Cursor(_) => Stage::ComparingDate,
            IngestError::Persistence(_) => Stage::Persisting,
        }
    }
}
