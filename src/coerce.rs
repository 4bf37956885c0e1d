//! Tolerant numeric and text coercion for fetched JSON.
//!
//! Amounts arrive from the API as numbers, numeric strings, empty strings or
//! `null` depending on which screen wrote them. Everything that is not a
//! finite number coerces to `0.0`; nothing here ever fails.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce an arbitrary JSON value to a finite `f64`, defaulting to `0.0`.
pub fn number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse(s),
        _ => 0.0,
    }
}

/// Coerce an optional JSON value (`None` = field absent) to `f64`.
pub fn optional_number(value: Option<&Value>) -> f64 {
    value.map(number).unwrap_or(0.0)
}

/// Parse a numeric string, defaulting to `0.0` for empty or non-numeric text.
pub fn parse(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// Serde helper: deserialize any JSON value as a coerced amount.
///
/// Pair with `#[serde(default)]` so a missing field also yields `0.0`.
pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value))
}

/// Serde helper: deserialize a quantity, truncating fractional input.
pub fn quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let n = number(&value);
    Ok(if n <= 0.0 { 0 } else { n.min(u32::MAX as f64) as u32 })
}

/// Serde helper: identifiers may be JSON strings or numbers.
pub fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number identifier, got {}",
            other
        ))),
    }
}

/// Serde helper: optional text where `null`, non-strings and blank strings
/// all mean "absent".
pub fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Serde helper: required-ish text that tolerates `null` and numbers.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}
