// src/ingest/types.rs
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::ingest::dates::DateFormat;

/// The five compiled-in draw sources, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    /// euromilhoes.com, "last results" container.
    EuromilhoesLatest = 1,
    /// euro-millions.com results page.
    EuroMillionsCom = 2,
    /// Santa Casa results board.
    SantaCasa = 3,
    /// euromilhoes.com, `<section class="last-results">`.
    EuromilhoesSection = 4,
    /// National Lottery draw-history CSV.
    NationalLotteryCsv = 5,
}

impl SourceId {
    pub const ALL: [SourceId; 5] = [
        SourceId::EuromilhoesLatest,
        SourceId::EuroMillionsCom,
        SourceId::SantaCasa,
        SourceId::EuromilhoesSection,
        SourceId::NationalLotteryCsv,
    ];

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Metric label.
    pub fn label(self) -> &'static str {
        match self {
            SourceId::EuromilhoesLatest => "1",
            SourceId::EuroMillionsCom => "2",
            SourceId::SantaCasa => "3",
            SourceId::EuromilhoesSection => "4",
            SourceId::NationalLotteryCsv => "5",
        }
    }

    pub fn descriptor(self) -> &'static SourceDescriptor {
        &SOURCES[self as usize - 1]
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Csv,
}

/// Static identity of one external source.
#[derive(Debug, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub id: SourceId,
    pub name: &'static str,
    pub endpoint: &'static str,
    pub kind: ContentKind,
    pub date_format: DateFormat,
}

const EUROMILHOES_URL: &str = "https://www.euromilhoes.com/";

pub static SOURCES: [SourceDescriptor; 5] = [
    SourceDescriptor {
        id: SourceId::EuromilhoesLatest,
        name: "euromilhoes-latest",
        endpoint: EUROMILHOES_URL,
        kind: ContentKind::Html,
        date_format: DateFormat::DotDmy,
    },
    SourceDescriptor {
        id: SourceId::EuroMillionsCom,
        name: "euro-millions",
        endpoint: "https://www.euro-millions.com/results",
        kind: ContentKind::Html,
        date_format: DateFormat::DashDmy,
    },
    SourceDescriptor {
        id: SourceId::SantaCasa,
        name: "santacasa",
        endpoint: "https://www.jogossantacasa.pt/web/SCCartazResult/",
        kind: ContentKind::Html,
        date_format: DateFormat::SlashDmy,
    },
    SourceDescriptor {
        id: SourceId::EuromilhoesSection,
        name: "euromilhoes-section",
        endpoint: EUROMILHOES_URL,
        kind: ContentKind::Html,
        date_format: DateFormat::DotDmy,
    },
    SourceDescriptor {
        id: SourceId::NationalLotteryCsv,
        name: "national-lottery",
        endpoint: "https://www.national-lottery.co.uk/results/euromillions/draw-history/csv",
        kind: ContentKind::Csv,
        date_format: DateFormat::DashDayMonthName,
    },
];

/// Opaque payload from one source, consumed once by its recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFetchResult {
    pub kind: ContentKind,
    pub body: String,
}

impl RawFetchResult {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Html,
            body: body.into(),
        }
    }

    pub fn csv(body: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Csv,
            body: body.into(),
        }
    }
}

/// Number tokens as a recipe found them, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawNumbers {
    /// Unlabeled run: first 5 are main, last 2 are stars.
    Combined(Vec<String>),
    /// Source separated main and star numbers itself.
    Grouped { main: Vec<String>, stars: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDraw {
    pub date: NaiveDate,
    pub numbers: DrawNumbers,
}

/// `--site` target: one source or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteSelection {
    One(SourceId),
    All,
}

impl SiteSelection {
    pub fn sources(self) -> Vec<SourceId> {
        match self {
            SiteSelection::One(id) => vec![id],
            SiteSelection::All => SourceId::ALL.to_vec(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported site id {0:?} (expected 1, 2, 3, 4, 5 or all)")]
pub struct UnsupportedSite(pub String);

impl FromStr for SiteSelection {
    type Err = UnsupportedSite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("all") {
            return Ok(SiteSelection::All);
        }
        t.parse::<u8>()
            .ok()
            .and_then(SourceId::from_number)
            .map(SiteSelection::One)
            .ok_or_else(|| UnsupportedSite(s.to_string()))
    }
}
