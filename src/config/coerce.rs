//! Type coercion from raw layer values.
//!
//! Pure functions with no I/O. Every failure names the key it was coercing.

use std::path::PathBuf;
use std::str::FromStr;

use super::source::RawValue;
use crate::errors::{ConfigError, ConfigResult};

const TRUE_VALUES: &[&str] = &["1", "true", "t", "yes", "y", "on"];
const FALSE_VALUES: &[&str] = &["0", "false", "f", "no", "n", "off"];

fn expect_text<'a>(key: &str, raw: &'a RawValue) -> ConfigResult<&'a str> {
    match raw {
        RawValue::Text(s) => Ok(s),
        RawValue::List(_) => Err(ConfigError::invalid(
            key,
            raw.to_string(),
            "expected a single value, found a list",
        )),
    }
}

pub fn string(key: &str, raw: &RawValue) -> ConfigResult<String> {
    expect_text(key, raw).map(str::to_string)
}

/// An empty value means the current directory.
pub fn path(key: &str, raw: &RawValue) -> ConfigResult<PathBuf> {
    let s = expect_text(key, raw)?;
    if s.is_empty() {
        return Ok(PathBuf::from("."));
    }
    Ok(PathBuf::from(s))
}

/// Integers and floats, parsed after trimming surrounding whitespace
pub fn number<T>(key: &str, raw: &RawValue) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let s = expect_text(key, raw)?;
    s.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::invalid(key, s, e.to_string()))
}

pub fn boolean(key: &str, raw: &RawValue) -> ConfigResult<bool> {
    let s = expect_text(key, raw)?;
    let normalized = s.trim().to_ascii_lowercase();

    if TRUE_VALUES.contains(&normalized.as_str()) {
        Ok(true)
    } else if FALSE_VALUES.contains(&normalized.as_str()) {
        Ok(false)
    } else {
        Err(ConfigError::invalid(key, s, "expected a boolean"))
    }
}

/// Normalize a list setting.
///
/// A native list passes through unchanged. Text starting with `[` is read as a
/// JSON array of strings. Any other text is split on commas and each entry
/// trimmed. Empty entries are kept in place.
pub fn list(key: &str, raw: &RawValue) -> ConfigResult<Vec<String>> {
    match raw {
        RawValue::List(items) => Ok(items.clone()),
        RawValue::Text(s) if s.trim_start().starts_with('[') => serde_json::from_str(s)
            .map_err(|e| ConfigError::invalid(key, s, format!("invalid JSON list: {}", e))),
        RawValue::Text(s) => Ok(split_comma_list(s)),
    }
}

fn split_comma_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|item| item.trim().to_string())
        .collect()
}
