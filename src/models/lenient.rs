//! Tolerant decoders for numeric fields that arrive as noisy text.
//!
//! Catalog rows and extraction output carry quantities like `"8mt"`,
//! `"20 ft"`, `"25,000"` or `"-"`. Anything that cannot be read as a positive
//! finite number decodes to `None` (unknown) instead of failing the request.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Deserialize an optional quantity from a JSON number or free text.
pub fn optional_quantity<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;

    Ok(raw.and_then(|value| match value {
        NumberOrText::Number(number) => positive(number),
        NumberOrText::Text(text) => parse_quantity(&text),
        NumberOrText::Other(_) => None,
    }))
}

/// Read the leading number of a quantity string, ignoring trailing units.
///
/// `"8mt"` -> 8.0, `"20 ft"` -> 20.0, `"25,000"` -> 25000.0, `"-"` -> None.
pub fn parse_quantity(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', "");
    let end = cleaned
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(cleaned.len());

    cleaned[..end].parse::<f64>().ok().and_then(positive)
}

/// `Some(value)` only for finite values above zero
#[inline]
pub fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}
