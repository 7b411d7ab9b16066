//! Field-level converters.
//!
//! Small pure functions, one per wire value shape. Entity converters compose them, eg: a collection
//! of points is [collection] over [point2].
use std::fmt::Display;
use std::str::FromStr;

use enumflags2::{BitFlag, BitFlags};
use glam::{DVec2, DVec3};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ConversionError, Result};

/// A number as the api sends it. v1 encodes most numbers as decimal strings, v2 uses json numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Number(number) => number.fmt(f),
            Scalar::Text(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// A collection sent either as an array (v1) or as an object keyed by id (v2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListOrKeyed<T> {
    List(Vec<T>),
    Keyed(IndexMap<String, T>),
}

impl<T> ListOrKeyed<T> {
    /// values in document order. keys are dropped, the values carry their own ids
    pub fn into_values(self) -> Vec<T> {
        match self {
            ListOrKeyed::List(values) => values,
            ListOrKeyed::Keyed(values) => values.into_values().collect(),
        }
    }
}

impl<T> Default for ListOrKeyed<T> {
    fn default() -> Self {
        ListOrKeyed::List(Vec::new())
    }
}

/// Converts every element in order. An absent collection becomes an empty one.
pub fn collection<I, O>(
    input: Option<Vec<I>>,
    element: impl FnMut(I) -> Result<O>,
) -> Result<Vec<O>> {
    input.unwrap_or_default().into_iter().map(element).collect()
}

/// Parses a wire number. Invalid text is an error, never zero.
pub fn number<T: FromStr>(scalar: &Scalar) -> Result<T> {
    let parsed = match scalar {
        Scalar::Number(number) => number.to_string().parse(),
        Scalar::Text(text) => text.trim().parse(),
    };
    parsed.map_err(|_| ConversionError::InvalidNumber {
        text: scalar.to_string(),
        target: std::any::type_name::<T>(),
    })
}

/// Like [number], but an absent field or blank text (v1 uses `""` for "no value") gives `None`.
pub fn optional_number<T: FromStr>(scalar: Option<&Scalar>) -> Result<Option<T>> {
    match scalar {
        None => Ok(None),
        Some(Scalar::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(scalar) => number(scalar).map(Some),
    }
}

/// [optional_number] with a fallback for absent fields
pub fn number_or<T: FromStr>(scalar: Option<&Scalar>, default: T) -> Result<T> {
    optional_number(scalar).map(|value| value.unwrap_or(default))
}

/// ORs together the flags named by `tokens` (case-insensitive). Unrecognized tokens are skipped.
pub fn flags<F>(tokens: Option<&[String]>) -> BitFlags<F>
where
    F: BitFlag + FromStr,
{
    let mut flags = BitFlags::empty();
    for token in tokens.unwrap_or_default() {
        match token.parse::<F>() {
            Ok(flag) => flags |= flag,
            Err(_) => trace!(
                token = token.as_str(),
                flags = std::any::type_name::<F>(),
                "ignoring unrecognized flag"
            ),
        }
    }
    flags
}

/// `[x, y]`. Any other length leaves the point at zero.
pub fn point2(coords: Option<&[f64]>) -> DVec2 {
    match coords {
        Some(&[x, y]) => DVec2::new(x, y),
        _ => DVec2::ZERO,
    }
}

/// `[x, y, z]`. Any other length leaves the point at zero.
pub fn point3(coords: Option<&[f64]>) -> DVec3 {
    match coords {
        Some(&[x, y, z]) => DVec3::new(x, y, z),
        _ => DVec3::ZERO,
    }
}

/// `[[x, y], ...]` where coordinates may be numbers or numeric strings.
/// Each pair is guarded like [point2], so the output always has the input's length.
pub fn point_list(pairs: Option<Vec<Vec<Scalar>>>) -> Result<Vec<DVec2>> {
    collection(pairs, |pair| {
        let coords = pair.iter().map(number).collect::<Result<Vec<f64>>>()?;
        Ok(point2(Some(&coords)))
    })
}
