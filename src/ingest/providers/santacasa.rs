// src/ingest/providers/santacasa.rs
//! Santa Casa results board (source 3).
//!
//! The only source with an explicit main/star separator: the result line reads
//! `<li>03 17 22 41 49 + 05 11`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ExtractError;
use crate::ingest::dates::{normalize, DateFormat};
use crate::ingest::types::{DrawNumbers, ExtractedDraw};

static RE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Data do Sorteio - (\d{2}/\d{2}/\d{4})").expect("valid santacasa date regex")
});

static RE_NUMBERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"<li>(\d{1,2})\s+(\d{1,2})\s+(\d{1,2})\s+(\d{1,2})\s+(\d{1,2})\s+\+\s+(\d{1,2})\s+(\d{1,2})",
    )
    .expect("valid santacasa numbers regex")
});

pub fn extract(html: &str) -> Result<ExtractedDraw, ExtractError> {
    let caps = RE_DATE
        .captures(html)
        .ok_or_else(|| ExtractError::locate_date("no 'Data do Sorteio' label"))?;
    let date = normalize(&caps[1], DateFormat::SlashDmy)?;

    let caps = RE_NUMBERS
        .captures(html)
        .ok_or_else(|| ExtractError::locate_numbers("no '<li>n n n n n + s s' result line"))?;
    let group = |range: std::ops::RangeInclusive<usize>| -> Vec<String> {
        range.map(|i| caps[i].to_string()).collect()
    };

    Ok(ExtractedDraw {
        date,
        numbers: DrawNumbers::Grouped {
            main: group(1..=5),
            stars: group(6..=7),
        },
    })
}
