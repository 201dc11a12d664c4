// src/ingest/validate.rs
//! Structural checks on extracted number tokens.
//!
//! Only count and integer parseability are checked; value ranges are the
//! source's business.

use std::cmp::Ordering;

use crate::draw::{DrawRecord, MAIN_COUNT, STAR_COUNT};
use crate::error::{NumberGroup, ValidationError};
use crate::ingest::types::{DrawNumbers, ExtractedDraw};

/// Turn an extracted draw into a [`DrawRecord`].
pub fn validate(extracted: &ExtractedDraw) -> Result<DrawRecord, ValidationError> {
    let (main, stars) = match &extracted.numbers {
        DrawNumbers::Combined(tokens) => {
            check_count(tokens, MAIN_COUNT + STAR_COUNT, NumberGroup::Combined)?;
            let values = parse_all(tokens, 0)?;
            let (main, stars) = values.split_at(MAIN_COUNT);
            (to_array::<MAIN_COUNT>(main), to_array::<STAR_COUNT>(stars))
        }
        DrawNumbers::Grouped { main, stars } => {
            check_count(main, MAIN_COUNT, NumberGroup::Main)?;
            check_count(stars, STAR_COUNT, NumberGroup::Stars)?;
            let m = parse_all(main, 0)?;
            let s = parse_all(stars, MAIN_COUNT)?;
            (to_array::<MAIN_COUNT>(&m), to_array::<STAR_COUNT>(&s))
        }
    };
    Ok(DrawRecord::new(extracted.date, main, stars))
}

fn check_count(
    tokens: &[String],
    expected: usize,
    group: NumberGroup,
) -> Result<(), ValidationError> {
    let found = tokens.len();
    match found.cmp(&expected) {
        Ordering::Equal => Ok(()),
        Ordering::Less => Err(ValidationError::TooFew {
            group,
            expected,
            found,
        }),
        Ordering::Greater => Err(ValidationError::TooMany {
            group,
            expected,
            found,
        }),
    }
}

// `offset` keeps reported positions 1-based across both groups.
fn parse_all(tokens: &[String], offset: usize) -> Result<Vec<u32>, ValidationError> {
    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| {
            t.trim().parse::<u32>().map_err(|_| ValidationError::NonNumeric {
                token: t.clone(),
                position: offset + i + 1,
            })
        })
        .collect()
}

// Callers have already checked the length.
fn to_array<const N: usize>(values: &[u32]) -> [u32; N] {
    let mut out = [0u32; N];
    out.copy_from_slice(values);
    out
}
