use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// A cell value after type-directed coercion.
///
/// Serialized untagged: dates as ISO-8601 strings, numbers as JSON numbers,
/// empty optional values as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Null,
    Date(NaiveDate),
    Currency(f64),
    Number(f64),
    Text(String),
    Email(String),
    Phone(String),
}

impl TypedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Currency(v) | TypedValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Null => Ok(()),
            TypedValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            TypedValue::Currency(v) => write!(f, "{v:.2}"),
            TypedValue::Number(v) => write!(f, "{v}"),
            TypedValue::Text(s) | TypedValue::Email(s) | TypedValue::Phone(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_untagged() {
        let date = TypedValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(serde_json::to_string(&date).unwrap(), r#""2024-03-01""#);
        assert_eq!(
            serde_json::to_string(&TypedValue::Currency(12.5)).unwrap(),
            "12.5"
        );
        assert_eq!(serde_json::to_string(&TypedValue::Null).unwrap(), "null");
    }

    #[test]
    fn display_formats_currency_with_cents() {
        assert_eq!(TypedValue::Currency(3.0).to_string(), "3.00");
        assert_eq!(TypedValue::Null.to_string(), "");
    }
}
