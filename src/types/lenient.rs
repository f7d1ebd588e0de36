//! Forgiving deserializers for numbers reported by remote backends.
//!
//! Backends send metrics as integers, floats, numeric strings or `null`.
//! These helpers accept all of them; `null` and missing fields become the
//! default, floats are rounded and out-of-range values are clamped.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

fn number_from_value<E: de::Error>(value: Value, field: &str) -> Result<Option<f64>, E> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                return Ok(None);
            }
            cleaned
                .parse::<f64>()
                .map(Some)
                .map_err(|_| E::custom(format!("{} is not a number: {:?}", field, s)))
        }
        other => Err(E::custom(format!("{} must be a number, got {}", field, other))),
    }
}

fn finite(n: Option<f64>) -> Option<f64> {
    n.filter(|v| v.is_finite())
}

/// `Option<u8>` score on a 0-100 scale.
pub fn score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let n = finite(number_from_value(Value::deserialize(deserializer)?, "score")?);
    Ok(n.map(|v| v.round().clamp(0.0, 100.0) as u8))
}

/// Non-negative count; `null` is 0.
pub fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = finite(number_from_value(Value::deserialize(deserializer)?, "count")?);
    Ok(n.map(|v| v.round().clamp(0.0, u64::MAX as f64) as u64).unwrap_or(0))
}

/// Index on a 0-100 scale; `null` is 0.
pub fn index<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let n = finite(number_from_value(Value::deserialize(deserializer)?, "index")?);
    Ok(n.map(|v| v.round().clamp(0.0, 100.0) as u8).unwrap_or(0))
}

/// Trend value; `null` is 0.
pub fn small_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = finite(number_from_value(Value::deserialize(deserializer)?, "value")?);
    Ok(n.map(|v| v.round().clamp(0.0, u32::MAX as f64) as u32).unwrap_or(0))
}

/// Amount such as a cost per click; `null` is 0.0.
pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = finite(number_from_value(Value::deserialize(deserializer)?, "amount")?);
    Ok(n.map(|v| v.max(0.0)).unwrap_or(0.0))
}

/// Free-form label: strings kept, numbers and booleans rendered, `null` empty.
pub fn label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!("label must be a scalar, got {}", other))),
    }
}
