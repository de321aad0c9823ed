//! Sanitizing free-text form fields before they reach the calculators.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};

/// Parses a user-typed amount such as `"Rp 1.500.000"` or `"-250,000"`.
///
/// Everything except ASCII digits and `-` is discarded, then the leading
/// `-?digits` prefix is parsed. Empty, unparsable or out-of-range input is `0`.
pub fn parse_formatted_number(raw: &str) -> i64 {
    let sanitized: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();

    let (negative, rest) = match sanitized.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, sanitized.as_str()),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return 0;
    }

    match digits.parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => {
            tracing::debug!(raw, "amount out of range, treating as zero");
            0
        }
    }
}

/// Reads an optional label where an unset select arrives as `""`.
///
/// Blank or whitespace-only strings (and `null`) become `None`; anything else
/// must parse through the target's `FromStr`.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}
