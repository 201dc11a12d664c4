// src/ingest/dates.rs
//! Strict per-source date parsing into canonical calendar dates.
//!
//! Each source publishes one fixed format. Input must match it exactly (zero
//! padded, no surrounding whitespace); anything else is a [`DateParseError`],
//! since a drifting date string usually means the page layout changed.

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::draw::CANONICAL_DATE_FORMAT;
use crate::error::DateParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `22.01.2024`
    DotDmy,
    /// `22-01-2024`
    DashDmy,
    /// `22/01/2024`
    SlashDmy,
    /// `22-Jan-2024`
    DashDayMonthName,
    /// `2024-01-22`
    Canonical,
}

impl DateFormat {
    fn chrono_pattern(self) -> &'static str {
        match self {
            DateFormat::DotDmy => "%d.%m.%Y",
            DateFormat::DashDmy => "%d-%m-%Y",
            DateFormat::SlashDmy => "%d/%m/%Y",
            DateFormat::DashDayMonthName => "%d-%b-%Y",
            DateFormat::Canonical => CANONICAL_DATE_FORMAT,
        }
    }

    // chrono accepts unpadded fields and any-case month names; these pin the shape.
    fn shape(self) -> &'static Regex {
        static DOT: Lazy<Regex> = Lazy::new(|| re(r"^\d{2}\.\d{2}\.\d{4}$"));
        static DASH: Lazy<Regex> = Lazy::new(|| re(r"^\d{2}-\d{2}-\d{4}$"));
        static SLASH: Lazy<Regex> = Lazy::new(|| re(r"^\d{2}/\d{2}/\d{4}$"));
        static MON: Lazy<Regex> = Lazy::new(|| re(r"^\d{2}-[A-Z][a-z]{2}-\d{4}$"));
        static ISO: Lazy<Regex> = Lazy::new(|| re(r"^\d{4}-\d{2}-\d{2}$"));
        match self {
            DateFormat::DotDmy => &*DOT,
            DateFormat::DashDmy => &*DASH,
            DateFormat::SlashDmy => &*SLASH,
            DateFormat::DashDayMonthName => &*MON,
            DateFormat::Canonical => &*ISO,
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateFormat::DotDmy => "DD.MM.YYYY",
            DateFormat::DashDmy => "DD-MM-YYYY",
            DateFormat::SlashDmy => "DD/MM/YYYY",
            DateFormat::DashDayMonthName => "DD-Mon-YYYY",
            DateFormat::Canonical => "YYYY-MM-DD",
        })
    }
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid date shape regex")
}

/// Parse `input` in exactly `format`.
pub fn normalize(input: &str, format: DateFormat) -> Result<NaiveDate, DateParseError> {
    let err = || DateParseError {
        input: input.to_string(),
        format,
    };
    if !format.shape().is_match(input) {
        return Err(err());
    }
    NaiveDate::parse_from_str(input, format.chrono_pattern()).map_err(|_| err())
}

/// Parse a stored/queried `YYYY-MM-DD` date.
pub fn parse_canonical(input: &str) -> Result<NaiveDate, DateParseError> {
    normalize(input, DateFormat::Canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn each_source_format_maps_to_the_same_day() {
        assert_eq!(normalize("22.01.2024", DateFormat::DotDmy), Ok(ymd(2024, 1, 22)));
        assert_eq!(normalize("22-01-2024", DateFormat::DashDmy), Ok(ymd(2024, 1, 22)));
        assert_eq!(normalize("22/01/2024", DateFormat::SlashDmy), Ok(ymd(2024, 1, 22)));
        assert_eq!(
            normalize("22-Jan-2024", DateFormat::DashDayMonthName),
            Ok(ymd(2024, 1, 22))
        );
        assert_eq!(parse_canonical("2024-01-22"), Ok(ymd(2024, 1, 22)));
    }

    #[test]
    fn rejects_anything_but_the_exact_shape() {
        for (input, fmt) in [
            ("2.1.2024", DateFormat::DotDmy),
            (" 22.01.2024", DateFormat::DotDmy),
            ("22.01.2024 ", DateFormat::DotDmy),
            ("22-01-2024", DateFormat::DotDmy),
            ("22.01.24", DateFormat::DotDmy),
            ("22/1/2024", DateFormat::SlashDmy),
            ("22-JAN-2024", DateFormat::DashDayMonthName),
            ("22-January-2024", DateFormat::DashDayMonthName),
            ("2024-1-22", DateFormat::Canonical),
            ("", DateFormat::DashDmy),
        ] {
            let e = normalize(input, fmt).unwrap_err();
            assert_eq!(e.input, input);
            assert_eq!(e.format, fmt);
        }
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        assert!(normalize("31.02.2024", DateFormat::DotDmy).is_err());
        assert!(normalize("00-01-2024", DateFormat::DashDmy).is_err());
        assert!(normalize("29-Feb-2023", DateFormat::DashDayMonthName).is_err());
        assert!(normalize("29-Feb-2024", DateFormat::DashDayMonthName).is_ok());
    }
}
