//! JSON front end.
//!
//! Arrays are read as raw `Sequence`s and then lifted into deduplicated
//! `Multiset`s, so nothing this module returns from `parse` can trip the
//! engines' raw-sequence check. Object key order is preserved.

use crate::node::{FilterNode, Float64, Mapping, Scalar};
use serde_json::Value;
use thiserror::Error as ThisError;

///
/// ParseError
///

#[derive(Debug, ThisError)]
pub enum ParseError {
    #[error("invalid filter json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("number {0} is not a finite float")]
    NonFiniteNumber(String),
}

/// Parse filter text into a tree ready for the engines.
///
/// Empty input and a bare `null` both mean "no filter" and parse as the
/// empty mapping.
pub fn parse(text: &str) -> Result<FilterNode, ParseError> {
    parse_raw(text).map(FilterNode::lift_sequences)
}

/// Parse filter text, keeping arrays as raw sequences.
pub fn parse_raw(text: &str) -> Result<FilterNode, ParseError> {
    if text.trim().is_empty() {
        return Ok(Mapping::new().into());
    }

    let value: Value = serde_json::from_str(text)?;
    if value.is_null() {
        return Ok(Mapping::new().into());
    }

    from_json(&value)
}

/// Convert an already-decoded JSON value. Arrays become raw sequences.
pub fn from_json(value: &Value) -> Result<FilterNode, ParseError> {
    let node = match value {
        Value::Null => Scalar::Null.into(),
        Value::Bool(v) => (*v).into(),
        Value::Number(n) => number(n)?.into(),
        Value::String(s) => s.as_str().into(),
        Value::Array(items) => FilterNode::Sequence(
            items
                .iter()
                .map(from_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(entries) => {
            let mut map = Mapping::with_capacity(entries.len());
            for (key, value) in entries {
                map.insert(key.as_str(), from_json(value)?);
            }

            map.into()
        }
    };

    Ok(node)
}

// integers that fit i64 stay integral; everything else is a float
fn number(n: &serde_json::Number) -> Result<Scalar, ParseError> {
    if let Some(v) = n.as_i64() {
        return Ok(Scalar::Int(v));
    }

    n.as_f64()
        .and_then(Float64::try_new)
        .map(Scalar::Float)
        .ok_or_else(|| ParseError::NonFiniteNumber(n.to_string()))
}

///
/// TESTS
///
