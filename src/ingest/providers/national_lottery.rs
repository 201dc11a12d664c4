// src/ingest/providers/national_lottery.rs
//! National Lottery draw-history CSV (source 5).
//!
//! Newest draw first. Column 0 is `DD-Mon-YYYY`, columns 1..=5 the balls and
//! 6..=7 the lucky stars; later columns (raffle codes, draw number) are ignored.

use csv::ReaderBuilder;

use crate::error::ExtractError;
use crate::ingest::dates::{normalize, DateFormat};
use crate::ingest::types::{DrawNumbers, ExtractedDraw};

const DATE_COL: usize = 0;
const MAIN_COLS: std::ops::RangeInclusive<usize> = 1..=5;
const STAR_COLS: std::ops::RangeInclusive<usize> = 6..=7;
const MIN_COLUMNS: usize = 8;

pub fn extract(body: &str) -> Result<ExtractedDraw, ExtractError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    // Header row is consumed by the reader; only its presence matters.
    let header_len = reader
        .headers()
        .map_err(|e| ExtractError::locate_date(format!("unreadable CSV header: {e}")))?
        .len();
    tracing::debug!(header_len, "national lottery csv header");

    let record = reader
        .records()
        .next()
        .ok_or_else(|| ExtractError::locate_date("CSV has no data rows"))?
        .map_err(|e| ExtractError::locate_date(format!("unreadable CSV row: {e}")))?;

    if record.len() < MIN_COLUMNS {
        return Err(ExtractError::count_numbers(format!(
            "expected at least {MIN_COLUMNS} columns, got {}",
            record.len()
        )));
    }

    // Date cell goes through untouched; ball cells are trimmed by the validator.
    let date = normalize(&record[DATE_COL], DateFormat::DashDayMonthName)?;
    let cols = |range: std::ops::RangeInclusive<usize>| -> Vec<String> {
        range.map(|i| record[i].to_string()).collect()
    };

    Ok(ExtractedDraw {
        date,
        numbers: DrawNumbers::Grouped {
            main: cols(MAIN_COLS),
            stars: cols(STAR_COLS),
        },
    })
}
