//! Coercion of loosely-typed input into the types the record store expects.
//!
//! The record store is untyped: identifiers arrive as numbers, numeric strings
//! or lookup objects, and form input arrives as strings. Everything crossing
//! the boundary goes through these helpers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Errors that can occur when coercing a raw value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoerceError {
    /// The input is empty after trimming.
    #[error("value cannot be empty")]
    Empty,
    /// The input is not an integer that fits the id range.
    #[error("invalid integer: {0:?}")]
    InvalidInteger(String),
    /// The input is not a decimal amount.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
    /// The input is not an ISO-8601 calendar date.
    #[error("invalid date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Parse a trimmed integer.
///
/// # Errors
///
/// Returns [`CoerceError::Empty`] for blank input and
/// [`CoerceError::InvalidInteger`] for anything that is not an `i32`.
pub fn parse_int(raw: &str) -> Result<i32, CoerceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoerceError::Empty);
    }
    trimmed
        .parse::<i32>()
        .map_err(|_| CoerceError::InvalidInteger(raw.to_owned()))
}

/// Parse a trimmed decimal amount (e.g. `"5000"`, `"0.01"`).
///
/// # Errors
///
/// Returns [`CoerceError::Empty`] for blank input and
/// [`CoerceError::InvalidAmount`] if the input is not a decimal number.
pub fn parse_amount(raw: &str) -> Result<Decimal, CoerceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoerceError::Empty);
    }
    trimmed
        .parse::<Decimal>()
        .map_err(|_| CoerceError::InvalidAmount(raw.to_owned()))
}

/// Parse a trimmed `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`CoerceError::Empty`] for blank input and
/// [`CoerceError::InvalidDate`] for anything else that is not a date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, CoerceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoerceError::Empty);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| CoerceError::InvalidDate(raw.to_owned()))
}

/// Raw shapes a foreign key can take in record store payloads.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLookup {
    Int(i64),
    Text(String),
    Object {
        #[serde(rename = "Id")]
        id: i64,
    },
}

impl RawLookup {
    fn into_i32(self) -> Result<i32, CoerceError> {
        match self {
            Self::Int(n) | Self::Object { id: n } => {
                i32::try_from(n).map_err(|_| CoerceError::InvalidInteger(n.to_string()))
            }
            Self::Text(s) => parse_int(&s),
        }
    }
}

/// Deserialize a required foreign key from an integer, a numeric string or a
/// lookup object (`{"Id": 42, "Name": "..."}`).
///
/// Use with `#[serde(deserialize_with = "coerce::lookup_id")]`.
///
/// # Errors
///
/// Fails if the value has none of the accepted shapes or is out of range.
pub fn lookup_id<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<i32>,
{
    let raw = RawLookup::deserialize(deserializer)?;
    raw.into_i32().map(T::from).map_err(serde::de::Error::custom)
}

/// Optional variant of [`lookup_id`]; `null` becomes `None`.
///
/// Pair with `#[serde(default)]` so a missing column is also `None`.
///
/// # Errors
///
/// Fails if a present value has none of the accepted shapes.
pub fn lookup_id_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<i32>,
{
    Option::<RawLookup>::deserialize(deserializer)?
        .map(|raw| raw.into_i32().map(T::from))
        .transpose()
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ContactId;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "lookup_id")]
        contact: ContactId,
        #[serde(default, deserialize_with = "lookup_id_opt")]
        other: Option<ContactId>,
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42"), Ok(42));
        assert_eq!(parse_int("  7 "), Ok(7));
        assert_eq!(parse_int(""), Err(CoerceError::Empty));
        assert!(matches!(
            parse_int("abc"),
            Err(CoerceError::InvalidInteger(_))
        ));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("5000").unwrap(), Decimal::new(5000, 0));
        assert_eq!(parse_amount("0.01").unwrap(), Decimal::new(1, 2));
        assert_eq!(parse_amount("   "), Err(CoerceError::Empty));
        assert!(matches!(
            parse_amount("lots"),
            Err(CoerceError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2025-01-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(matches!(
            parse_date("01/01/2025"),
            Err(CoerceError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_lookup_accepts_number_string_and_object() {
        let row: Row = serde_json::from_str(r#"{"contact": 42}"#).unwrap();
        assert_eq!(row.contact, ContactId::new(42));
        assert_eq!(row.other, None);

        let row: Row = serde_json::from_str(r#"{"contact": "42", "other": null}"#).unwrap();
        assert_eq!(row.contact, ContactId::new(42));
        assert_eq!(row.other, None);

        let row: Row =
            serde_json::from_str(r#"{"contact": {"Id": 42, "Name": "Ada"}, "other": "9"}"#)
                .unwrap();
        assert_eq!(row.contact, ContactId::new(42));
        assert_eq!(row.other, Some(ContactId::new(9)));
    }

    #[test]
    fn test_lookup_rejects_out_of_range() {
        let result: Result<Row, _> = serde_json::from_str(r#"{"contact": 9999999999}"#);
        assert!(result.is_err());
    }
}
