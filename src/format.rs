// src/format.rs
//! JSON / XML / plain-text renderings of stored draws.

use serde::Serialize;
use thiserror::Error;

use crate::draw::DrawRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
    PlainText,
}

impl OutputFormat {
    /// `?format=` value; unknown or missing selects JSON.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("xml") => OutputFormat::Xml,
            Some("plaintext") => OutputFormat::PlainText,
            _ => OutputFormat::Json,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Xml => "application/xml",
            OutputFormat::PlainText => "text/plain; charset=utf-8",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::PlainText => "plaintext",
        }
    }
}

/// Whether an endpoint answers with one draw or a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Single,
    Collection,
}

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("xml encoding failed: {0}")]
    Xml(String),
}

#[derive(Serialize)]
struct JsonDraw<'a> {
    date: String,
    numbers: &'a [u32],
    stars: &'a [u32],
}

// XML nests each sequence under a wrapper element: <numbers><number>3</number>...
#[derive(Serialize)]
struct XmlNumbers<'a> {
    number: &'a [u32],
}

#[derive(Serialize)]
struct XmlStars<'a> {
    star: &'a [u32],
}

#[derive(Serialize)]
#[serde(rename = "result")]
struct XmlDraw<'a> {
    date: String,
    numbers: XmlNumbers<'a>,
    stars: XmlStars<'a>,
}

#[derive(Serialize)]
#[serde(rename = "results")]
struct XmlDraws<'a> {
    result: Vec<XmlDraw<'a>>,
}

impl<'a> From<&'a DrawRecord> for JsonDraw<'a> {
    fn from(r: &'a DrawRecord) -> Self {
        Self {
            date: r.canonical_date(),
            numbers: r.main_numbers(),
            stars: r.star_numbers(),
        }
    }
}

impl<'a> From<&'a DrawRecord> for XmlDraw<'a> {
    fn from(r: &'a DrawRecord) -> Self {
        Self {
            date: r.canonical_date(),
            numbers: XmlNumbers {
                number: r.main_numbers(),
            },
            stars: XmlStars {
                star: r.star_numbers(),
            },
        }
    }
}

/// Render `draws` (non-empty) in `format`.
pub fn render(
    draws: &[DrawRecord],
    shape: Shape,
    format: OutputFormat,
) -> Result<String, FormatError> {
    let single = shape == Shape::Single && draws.len() == 1;
    match format {
        OutputFormat::Json => {
            let views: Vec<JsonDraw> = draws.iter().map(JsonDraw::from).collect();
            if single {
                Ok(serde_json::to_string(&views[0])?)
            } else {
                Ok(serde_json::to_string(&views)?)
            }
        }
        OutputFormat::Xml => {
            let out = if single {
                quick_xml::se::to_string(&XmlDraw::from(&draws[0]))
            } else {
                quick_xml::se::to_string(&XmlDraws {
                    result: draws.iter().map(XmlDraw::from).collect(),
                })
            };
            out.map_err(|e| FormatError::Xml(e.to_string()))
        }
        OutputFormat::PlainText => Ok(draws.iter().map(plain_line).collect()),
    }
}

fn plain_line(r: &DrawRecord) -> String {
    let join = |xs: &[u32]| {
        xs.iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",")
    };
    format!(
        "Date: {}, Numbers: {}, Stars: {}\n",
        r.canonical_date(),
        join(r.main_numbers()),
        join(r.star_numbers())
    )
}
