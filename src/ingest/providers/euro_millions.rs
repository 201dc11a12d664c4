// src/ingest/providers/euro_millions.rs
//! euro-millions.com results page (source 2).
//!
//! The draw date only exists as the path of the first results-detail link
//! (`/results/22-01-2024`); numbers are the elements of `<ul class="balls">`,
//! main balls first and lucky stars last.

use super::{between, element_digits};
use crate::error::ExtractError;
use crate::ingest::dates::{normalize, DateFormat};
use crate::ingest::types::{DrawNumbers, ExtractedDraw};

pub fn extract(html: &str) -> Result<ExtractedDraw, ExtractError> {
    let raw_date = between(html, r#"<li><a href="/results/"#, "\"")
        .ok_or_else(|| ExtractError::locate_date("no /results/<date> link"))?;
    let date = normalize(raw_date, DateFormat::DashDmy)?;

    let balls = between(html, r#"<ul class="balls">"#, "</ul>")
        .ok_or_else(|| ExtractError::locate_numbers("balls list not found"))?;
    let tokens = element_digits(balls);
    tracing::debug!(?tokens, %date, "euro-millions tokens");

    Ok(ExtractedDraw {
        date,
        numbers: DrawNumbers::Combined(tokens),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractStage;

    #[test]
    fn link_date_is_taken_from_the_path_fragment() {
        let html = r#"<li><a href="/results/05-02-2024">Fri</a></li>
<ul class="balls"><li>1</li><li>2</li><li>3</li><li>4</li><li>5</li><li>6</li><li>7</li></ul>"#;
        let d = extract(html).unwrap();
        assert_eq!(d.date.to_string(), "2024-02-05");
        assert_eq!(
            d.numbers,
            DrawNumbers::Combined(["1", "2", "3", "4", "5", "6", "7"].map(String::from).to_vec())
        );
    }

    #[test]
    fn missing_balls_list_fails_at_locate_numbers() {
        let html = r#"<li><a href="/results/05-02-2024">Fri</a></li>"#;
        assert_eq!(extract(html).unwrap_err().stage(), ExtractStage::LocateNumbers);
    }
}
