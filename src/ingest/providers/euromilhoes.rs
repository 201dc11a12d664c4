// src/ingest/providers/euromilhoes.rs
//! euromilhoes.com home page. Two independent recipes read two different
//! regions of the same document (sources 1 and 4).

use once_cell::sync::Lazy;
use regex::Regex;

use super::{between, element_digits};
use crate::error::ExtractError;
use crate::ingest::dates::{normalize, DateFormat};
use crate::ingest::types::{DrawNumbers, ExtractedDraw};

const RESULTS_OPEN: &str = r#"<ul class="results">"#;
const RESULTS_CLOSE: &str = "</ul>";

/// Source 1: the "last results" container.
///
/// Date is the first `<span>` in the container; numbers are the digit
/// elements of its `<ul class="results">` list (5 main, then 2 stars).
pub fn extract_latest_container(html: &str) -> Result<ExtractedDraw, ExtractError> {
    let container = between(html, "last-results-container", "selector-wrapper")
        .ok_or_else(|| ExtractError::locate_date("last-results container not found"))?;
    let raw_date = between(container, "<span>", "</span>")
        .ok_or_else(|| ExtractError::locate_date("no <span> date in last-results container"))?;
    let date = normalize(raw_date, DateFormat::DotDmy)?;

    let list = between(container, RESULTS_OPEN, RESULTS_CLOSE)
        .ok_or_else(|| ExtractError::locate_numbers("results list missing from container"))?;
    let tokens = element_digits(list);
    tracing::debug!(?tokens, %date, "euromilhoes container tokens");

    Ok(ExtractedDraw {
        date,
        numbers: DrawNumbers::Combined(tokens),
    })
}

/// Source 4: `<section class="last-results">`.
///
/// Date is the `DD.MM.YYYY` span inside the section; numbers come from the
/// first results list anywhere in the document.
pub fn extract_results_section(html: &str) -> Result<ExtractedDraw, ExtractError> {
    static RE_SPAN_DATE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"<span>(\d{2}\.\d{2}\.\d{4})</span>").expect("valid section date regex")
    });

    let section = between(html, r#"<section class="last-results">"#, "</section>")
        .ok_or_else(|| ExtractError::locate_date("last-results section not found"))?;
    tracing::debug!(bytes = section.len(), "euromilhoes section snippet");
    let caps = RE_SPAN_DATE
        .captures(section)
        .ok_or_else(|| ExtractError::locate_date("no dated <span> in last-results section"))?;
    let date = normalize(&caps[1], DateFormat::DotDmy)?;

    let list = between(html, RESULTS_OPEN, RESULTS_CLOSE)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| ExtractError::locate_numbers("results list not found"))?;
    let tokens = element_digits(list);
    tracing::debug!(?tokens, %date, "euromilhoes section tokens");

    Ok(ExtractedDraw {
        date,
        numbers: DrawNumbers::Combined(tokens),
    })
}
