//! Lenient numeric deserialization for free-text entry fields
//!
//! Entity files are edited by hand, and the numeric fields mirror free-text
//! entry boxes elsewhere in the system: a value that is missing, empty, or
//! unparsable is coerced to zero rather than rejecting the whole file.

use serde::{Deserialize, Deserializer};

/// Replace non-finite values with zero
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Missing(Option<()>),
}

fn coerce(raw: RawNumber) -> f64 {
    match raw {
        RawNumber::Number(n) => finite_or_zero(n),
        RawNumber::Text(s) => finite_or_zero(s.trim().parse::<f64>().unwrap_or(0.0)),
        RawNumber::Missing(_) => 0.0,
    }
}

/// Deserialize a number, numeric string, or null into an f64, coercing
/// anything unparsable to zero
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce(RawNumber::deserialize(deserializer)?))
}

/// Same as [`lenient_f64`] but clamps the result to at least one serving
pub fn lenient_servings<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce(RawNumber::deserialize(deserializer)?).max(1.0))
}
