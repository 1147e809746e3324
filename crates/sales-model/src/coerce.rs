//! Type-directed parsing of raw cell text.
//!
//! Shared by column profiling (which only asks "does this look like a
//! date?") and the row validator (which keeps the parsed value).

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use thiserror::Error;

use crate::field::FieldType;
use crate::value::TypedValue;

/// Earliest date accepted by the validator.
pub const MIN_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1900, 1, 1) {
    Some(date) => date,
    None => panic!("invalid minimum date"),
};

/// Latest date accepted by the validator.
pub const MAX_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2100, 12, 31) {
    Some(date) => date,
    None => panic!("invalid maximum date"),
};

/// Minimum and maximum digit count of a phone number.
pub const PHONE_DIGITS: (usize, usize) = (7, 15);

/// Date formats tried in order. US month-first wins over day-first when
/// both are valid calendar dates.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Compact `YYYYMMDD` form.
static COMPACT_DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").expect("Invalid compact date regex"));

/// Plain decimal literal once symbols and separators are removed.
static NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("Invalid number regex")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("Invalid email regex")
});

/// Digits with the usual separators and an optional leading `+`.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9().\-/ ]+$").expect("Invalid phone regex"));

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹', '\u{a0}'];

/// Why a raw value could not be coerced to a field type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    #[error("'{0}' is not a recognized date")]
    Date(String),
    #[error("'{0}' is not a valid amount")]
    Currency(String),
    #[error("'{0}' is not a valid number")]
    Number(String),
    #[error("'{0}' is not a valid email address")]
    Email(String),
    #[error("'{0}' is not a valid phone number")]
    Phone(String),
}

/// Coerce a raw cell to a typed value.
///
/// Empty (after trimming) input yields [`TypedValue::Null`]; whether that is
/// acceptable is up to the caller. Text and unknown fields never fail.
pub fn coerce(raw: &str, field_type: FieldType) -> Result<TypedValue, CoerceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(TypedValue::Null);
    }

    match field_type {
        FieldType::Date => parse_date(trimmed)
            .map(TypedValue::Date)
            .ok_or_else(|| CoerceError::Date(trimmed.to_string())),
        FieldType::Currency => parse_number(trimmed)
            .map(TypedValue::Currency)
            .ok_or_else(|| CoerceError::Currency(trimmed.to_string())),
        FieldType::Number => parse_number(trimmed)
            .map(TypedValue::Number)
            .ok_or_else(|| CoerceError::Number(trimmed.to_string())),
        FieldType::Email => {
            if is_email(trimmed) {
                Ok(TypedValue::Email(trimmed.to_string()))
            } else {
                Err(CoerceError::Email(trimmed.to_string()))
            }
        }
        FieldType::Phone => {
            if is_phone(trimmed) {
                Ok(TypedValue::Phone(trimmed.to_string()))
            } else {
                Err(CoerceError::Phone(trimmed.to_string()))
            }
        }
        FieldType::Text | FieldType::Unknown => Ok(TypedValue::Text(trimmed.to_string())),
    }
}

/// Parse a calendar date; any time component is discarded.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(caps) = COMPACT_DATE_REGEX.captures(value) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|datetime| datetime.date())
}

/// Parse a numeric or monetary literal.
///
/// Currency symbols, thousands separators and surrounding whitespace are
/// removed; accounting parentheses `(12.50)` denote a negative amount.
/// Non-finite results are rejected.
pub fn parse_number(value: &str) -> Option<f64> {
    let mut text = value.trim();
    let mut negative = false;

    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        negative = true;
        text = inner.trim();
    }

    let cleaned: String = text
        .chars()
        .filter(|ch| !CURRENCY_SYMBOLS.contains(ch) && *ch != ',' && !ch.is_whitespace())
        .collect();
    if cleaned.is_empty() || !NUMBER_REGEX.is_match(&cleaned) {
        return None;
    }
    // A sign inside accounting parentheses is ambiguous.
    if negative && cleaned.starts_with(['-', '+']) {
        return None;
    }

    let number: f64 = cleaned.parse().ok()?;
    if !number.is_finite() {
        return None;
    }
    Some(if negative { -number } else { number })
}

pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value.trim())
}

/// Digits with separators, between 7 and 15 digits in total.
pub fn is_phone(value: &str) -> bool {
    let value = value.trim();
    if !PHONE_REGEX.is_match(value) {
        return false;
    }
    let digits = value.chars().filter(char::is_ascii_digit).count();
    (PHONE_DIGITS.0..=PHONE_DIGITS.1).contains(&digits)
}

/// Most specific type a single non-empty value looks like.
///
/// Used for column profiling only: pure digit strings are reported as
/// numbers rather than compact dates or phone numbers, and values carrying
/// a currency symbol or accounting parentheses as currency.
pub fn infer_value_type(value: &str) -> Option<FieldType> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if is_email(value) {
        return Some(FieldType::Email);
    }
    let all_digits = value.chars().all(|ch| ch.is_ascii_digit());
    if !all_digits && parse_date(value).is_some() {
        return Some(FieldType::Date);
    }
    if parse_number(value).is_some() {
        let monetary = value.contains(CURRENCY_SYMBOLS) || value.starts_with('(');
        return Some(if monetary {
            FieldType::Currency
        } else {
            FieldType::Number
        });
    }
    if is_phone(value) {
        return Some(FieldType::Phone);
    }
    Some(FieldType::Text)
}
