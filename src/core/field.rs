//! Field values exposed by records for filtering and sorting

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Time(NaiveTime),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Parse `text` as a value of the same kind as `self`
    ///
    /// Returns `None` when `text` is not a valid literal of that kind, or when
    /// `self` is null.
    pub fn parse_like(&self, text: &str) -> Option<FieldValue> {
        let text = text.trim();
        match self {
            FieldValue::String(_) => Some(FieldValue::String(text.to_string())),
            FieldValue::Integer(_) => text.parse().ok().map(FieldValue::Integer),
            FieldValue::Float(_) => text
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(FieldValue::Float),
            FieldValue::Boolean(_) => match text {
                "true" | "True" | "1" => Some(FieldValue::Boolean(true)),
                "false" | "False" | "0" => Some(FieldValue::Boolean(false)),
                _ => None,
            },
            FieldValue::DateTime(_) => parse_datetime(text).map(FieldValue::DateTime),
            FieldValue::Time(_) => NaiveTime::parse_from_str(text, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
                .ok()
                .map(FieldValue::Time),
            FieldValue::Null => None,
        }
    }

    /// Compare two values of the same kind; `None` across kinds or for null
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.cmp(b)),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(b),
            (FieldValue::Integer(a), FieldValue::Float(b)) => (*a as f64).partial_cmp(b),
            (FieldValue::Float(a), FieldValue::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => Some(a.cmp(b)),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => Some(a.cmp(b)),
            (FieldValue::Time(a), FieldValue::Time(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used for sorting: null sorts first, mismatched kinds are equal
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.compare(other).unwrap_or(Ordering::Equal),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map(FieldValue::String).unwrap_or(FieldValue::Null)
    }
}

impl From<Option<DateTime<Utc>>> for FieldValue {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        value.map(FieldValue::DateTime).unwrap_or(FieldValue::Null)
    }
}

/// RFC 3339 timestamps, or a bare `YYYY-MM-DD` date taken as midnight UTC
fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_field_value_string() {
        let value = FieldValue::String("test".to_string());
        assert_eq!(value.as_string(), Some("test"));
        assert_eq!(value.as_integer(), None);
        assert!(!value.is_null());
    }

    #[test]
    fn test_parse_like_integer() {
        let value = FieldValue::Integer(1);
        assert_eq!(value.parse_like(" 42 "), Some(FieldValue::Integer(42)));
        assert_eq!(value.parse_like("4x"), None);
    }

    #[test]
    fn test_parse_like_datetime_accepts_date() {
        let value = FieldValue::DateTime(Utc::now());
        let parsed = value.parse_like("2019-03-01").unwrap();
        assert_eq!(
            parsed,
            FieldValue::DateTime(Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_like_time() {
        let value = FieldValue::Time(NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(
            value.parse_like("22:30"),
            Some(FieldValue::Time(NaiveTime::from_hms_opt(22, 30, 0).unwrap()))
        );
    }

    #[test]
    fn test_compare_mixed_numbers() {
        assert_eq!(
            FieldValue::Integer(2).compare(&FieldValue::Float(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(FieldValue::Integer(2).compare(&FieldValue::from("2")), None);
    }

    #[test]
    fn test_sort_cmp_null_first() {
        assert_eq!(
            FieldValue::Null.sort_cmp(&FieldValue::from("a")),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::from("b").sort_cmp(&FieldValue::from("a")),
            Ordering::Greater
        );
    }
}
