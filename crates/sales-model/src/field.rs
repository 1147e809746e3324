//! Target schema field definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value type of a target field.
///
/// Drives both the content heuristics of the auto-mapper and the
/// type-directed coercion performed by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Calendar date (time of day is accepted and discarded).
    Date,
    /// Monetary amount; currency symbols and separators are tolerated.
    Currency,
    /// Plain numeric literal.
    Number,
    /// Free text, never rejected.
    Text,
    /// E-mail address.
    Email,
    /// Telephone number made of digits and separators.
    Phone,
    /// No type semantics; accepted as text.
    Unknown,
}

impl FieldType {
    /// Canonical lowercase name, as written in schema files.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Date => "date",
            FieldType::Currency => "currency",
            FieldType::Number => "number",
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Unknown => "unknown",
        }
    }

    /// True for types whose values parse to `f64`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Currency | FieldType::Number)
    }

    /// Parse a type name leniently; unrecognized names become [`FieldType::Unknown`].
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(FieldType::Unknown)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" | "datetime" | "timestamp" => Ok(FieldType::Date),
            "currency" | "money" | "price" => Ok(FieldType::Currency),
            "number" | "num" | "numeric" | "integer" | "int" | "decimal" => Ok(FieldType::Number),
            "text" | "char" | "string" => Ok(FieldType::Text),
            "email" | "e-mail" => Ok(FieldType::Email),
            "phone" | "telephone" => Ok(FieldType::Phone),
            "unknown" | "" => Ok(FieldType::Unknown),
            _ => Err(format!("Unknown field type: {s}")),
        }
    }
}

/// A column of the fixed destination schema.
///
/// Defined by the schema registry and immutable for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetField {
    pub id: String,
    pub label: String,
    pub required: bool,
    pub field_type: FieldType,
    pub description: String,
    /// Header spellings that identify this field exactly.
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// Header fragments that suggest this field.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Inclusive lower bound for numeric values.
    #[serde(default)]
    pub min: Option<f64>,
    /// Inclusive upper bound for numeric values.
    #[serde(default)]
    pub max: Option<f64>,
}

impl TargetField {
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            required: false,
            field_type,
            description: String::new(),
            synonyms: Vec::new(),
            keywords: Vec::new(),
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_parses_aliases() {
        assert_eq!("Money".parse::<FieldType>(), Ok(FieldType::Currency));
        assert_eq!("num".parse::<FieldType>(), Ok(FieldType::Number));
        assert_eq!(" E-Mail ".parse::<FieldType>(), Ok(FieldType::Email));
        assert!("blob".parse::<FieldType>().is_err());
        assert_eq!(FieldType::parse_lenient("blob"), FieldType::Unknown);
    }

    #[test]
    fn field_type_display_round_trips() {
        for ty in [
            FieldType::Date,
            FieldType::Currency,
            FieldType::Number,
            FieldType::Text,
            FieldType::Email,
            FieldType::Phone,
            FieldType::Unknown,
        ] {
            assert_eq!(ty.to_string().parse::<FieldType>(), Ok(ty));
        }
    }
}
