// src/draw.rs
use std::fmt;

use chrono::NaiveDate;

pub const MAIN_COUNT: usize = 5;
pub const STAR_COUNT: usize = 2;

/// Canonical storage/comparison form of a draw date.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// One normalized draw: date + 5 main numbers + 2 star numbers.
///
/// The fixed-size arrays carry the count invariant; values keep the order the
/// source published them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRecord {
    date: NaiveDate,
    main: [u32; MAIN_COUNT],
    stars: [u32; STAR_COUNT],
}

impl DrawRecord {
    pub const fn new(date: NaiveDate, main: [u32; MAIN_COUNT], stars: [u32; STAR_COUNT]) -> Self {
        Self { date, main, stars }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Zero-padded `YYYY-MM-DD`.
    pub fn canonical_date(&self) -> String {
        self.date.format(CANONICAL_DATE_FORMAT).to_string()
    }

    pub fn main_numbers(&self) -> &[u32; MAIN_COUNT] {
        &self.main
    }

    pub fn star_numbers(&self) -> &[u32; STAR_COUNT] {
        &self.stars
    }
}

impl fmt::Display for DrawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |xs: &[u32]| {
            xs.iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(",")
        };
        write!(
            f,
            "{} [{}] + [{}]",
            self.canonical_date(),
            join(&self.main),
            join(&self.stars)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_date_is_zero_padded() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        let r = DrawRecord::new(d, [8, 19, 27, 33, 44], [2, 9]);
        assert_eq!(r.canonical_date(), "2024-02-05");
        assert_eq!(r.to_string(), "2024-02-05 [8,19,27,33,44] + [2,9]");
    }
}
