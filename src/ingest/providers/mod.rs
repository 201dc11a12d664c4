// src/ingest/providers/mod.rs
//! One extraction recipe per source, dispatched by [`SourceId`].
//!
//! Sources sharing a host still get their own recipe: each one reads a single
//! page region or feed.

pub mod euro_millions;
pub mod euromilhoes;
pub mod national_lottery;
pub mod santacasa;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ExtractError;
use crate::ingest::types::{ExtractedDraw, RawFetchResult, SourceId};

impl SourceId {
    /// Run this source's recipe over a fetched payload.
    pub fn extract(self, raw: &RawFetchResult) -> Result<ExtractedDraw, ExtractError> {
        let t0 = std::time::Instant::now();
        let out = match self {
            SourceId::EuromilhoesLatest => euromilhoes::extract_latest_container(&raw.body),
            SourceId::EuroMillionsCom => euro_millions::extract(&raw.body),
            SourceId::SantaCasa => santacasa::extract(&raw.body),
            SourceId::EuromilhoesSection => euromilhoes::extract_results_section(&raw.body),
            SourceId::NationalLotteryCsv => national_lottery::extract(&raw.body),
        };
        tracing::debug!(
            source = %self,
            bytes = raw.body.len(),
            elapsed_ms = t0.elapsed().as_secs_f64() * 1_000.0,
            ok = out.is_ok(),
            "extraction finished"
        );
        out
    }
}

/// Text strictly between the first `start` and the next `end` after it.
pub(crate) fn between<'a>(s: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = s.find(start)? + start.len();
    let len = s[from..].find(end)?;
    Some(&s[from..from + len])
}

/// Every `>123<` digit run, in document order.
pub(crate) fn element_digits(fragment: &str) -> Vec<String> {
    static RE_DIGITS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r">(\d+)<").expect("valid digit regex"));
    RE_DIGITS
        .captures_iter(fragment)
        .map(|c| c[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_takes_first_start_and_following_end() {
        let s = "a<b>1</b><b>2</b>";
        assert_eq!(between(s, "<b>", "</b>"), Some("1"));
        assert_eq!(between(s, "<i>", "</i>"), None);
        assert_eq!(between(s, "<b>", "</i>"), None);
        assert_eq!(between("<b></b>", "<b>", "</b>"), Some(""));
    }

    #[test]
    fn element_digits_ignores_whitespace_and_attributes() {
        let s = r#"<li class="n1">3</li>
            <li>17</li><li> 22 </li><li data-x="4">41</li>"#;
        assert_eq!(element_digits(s), vec!["3", "17", "41"]);
    }
}
