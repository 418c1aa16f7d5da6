//! Raw query value coercion
//!
//! Turns the string a client sent into the typed operand its lookup expects.
//! A value that cannot be coerced is dropped together with its key rather
//! than reported, matching the whitelist policy in [`super::fields`].

use crate::core::lookup::Lookup;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A value as received from the transport layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Single(String),
    Many(Vec<String>),
}

impl RawValue {
    /// The value a single-valued consumer should see: the string itself, or
    /// the first element of a list
    pub fn first(&self) -> Option<&str> {
        match self {
            RawValue::Single(s) => Some(s),
            RawValue::Many(values) => values.first().map(String::as_str),
        }
    }

    /// Append another occurrence of the same key
    pub fn push(&mut self, value: String) {
        match self {
            RawValue::Single(existing) => {
                *self = RawValue::Many(vec![std::mem::take(existing), value]);
            }
            RawValue::Many(values) => values.push(value),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Single(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Single(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(values: Vec<String>) -> Self {
        RawValue::Many(values)
    }
}

/// A coerced filter operand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Integer(i64),
    List(Vec<String>),
    Text(String),
}

impl FilterValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FilterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FilterValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FilterValue::List(items) => Some(items),
            _ => None,
        }
    }
}

fn bracket_pattern() -> &'static Regex {
    static BRACKETS: OnceLock<Regex> = OnceLock::new();
    BRACKETS.get_or_init(|| Regex::new(r#"[\[\]()'"]"#).expect("static pattern is valid"))
}

/// Split a list literal such as `[1, 2, 3]` or `('a','b')` into its items
///
/// Brackets and quotes are removed wherever they occur, items are trimmed and
/// empty items are discarded.
pub fn split_sequence(raw: &str) -> Vec<String> {
    bracket_pattern()
        .replace_all(raw, "")
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerce a raw value for the given lookup
///
/// Returns `None` when the key should be dropped: a `range` with more than
/// two bounds, or a calendar extractor whose operand is not an integer.
pub fn coerce(lookup: Option<Lookup>, raw: &RawValue) -> Option<FilterValue> {
    let value = raw.first().unwrap_or_default();

    match lookup {
        Some(op) if op.expects_sequence() => {
            let items = split_sequence(value);
            if op == Lookup::Range && items.len() > 2 {
                return None;
            }
            Some(FilterValue::List(items))
        }
        Some(Lookup::IsNull) => Some(FilterValue::Bool(value == "true")),
        Some(op) if op.expects_integer() => value.parse().ok().map(FilterValue::Integer),
        None if value == "true" || value == "false" => Some(FilterValue::Bool(value == "true")),
        _ => Some(FilterValue::Text(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(s: &str) -> RawValue {
        RawValue::from(s)
    }

    #[test]
    fn test_in_strips_brackets_and_spaces() {
        let value = coerce(Some(Lookup::In), &raw("[1, 2, 3]")).unwrap();
        assert_eq!(value, FilterValue::List(vec!["1".into(), "2".into(), "3".into()]));
    }

    #[test]
    fn test_in_strips_quotes_and_parentheses() {
        let value = coerce(Some(Lookup::In), &raw("('Aberdeen', \"Leeds\")")).unwrap();
        assert_eq!(
            value,
            FilterValue::List(vec!["Aberdeen".into(), "Leeds".into()])
        );
    }

    #[test]
    fn test_in_drops_empty_items() {
        let value = coerce(Some(Lookup::In), &raw("a,, ,b,")).unwrap();
        assert_eq!(value, FilterValue::List(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_in_takes_first_list_element() {
        let value = RawValue::Many(vec!["1,2".into(), "3".into()]);
        let coerced = coerce(Some(Lookup::In), &value).unwrap();
        assert_eq!(coerced, FilterValue::List(vec!["1".into(), "2".into()]));
    }

    #[test]
    fn test_range_two_bounds_kept() {
        let value = coerce(Some(Lookup::Range), &raw("(1,10)")).unwrap();
        assert_eq!(value, FilterValue::List(vec!["1".into(), "10".into()]));
    }

    #[test]
    fn test_range_three_bounds_dropped() {
        assert!(coerce(Some(Lookup::Range), &raw("1,2,3")).is_none());
    }

    #[test]
    fn test_isnull_is_boolean() {
        assert_eq!(coerce(Some(Lookup::IsNull), &raw("true")), Some(FilterValue::Bool(true)));
        assert_eq!(coerce(Some(Lookup::IsNull), &raw("yes")), Some(FilterValue::Bool(false)));
    }

    #[test]
    fn test_bare_boolean_literal() {
        assert_eq!(coerce(None, &raw("false")), Some(FilterValue::Bool(false)));
        assert_eq!(coerce(None, &raw("true")), Some(FilterValue::Bool(true)));
        assert_eq!(coerce(None, &raw("True")), Some(FilterValue::Text("True".into())));
    }

    #[test]
    fn test_calendar_operators_parse_integer() {
        assert_eq!(coerce(Some(Lookup::Year), &raw("2019")), Some(FilterValue::Integer(2019)));
        assert_eq!(coerce(Some(Lookup::WeekDay), &raw("3")), Some(FilterValue::Integer(3)));
        assert!(coerce(Some(Lookup::Month), &raw("june")).is_none());
    }

    #[test]
    fn test_text_operators_pass_through() {
        assert_eq!(
            coerce(Some(Lookup::IContains), &raw(" cafe ")),
            Some(FilterValue::Text(" cafe ".into()))
        );
        assert_eq!(coerce(Some(Lookup::Gt), &raw("5")), Some(FilterValue::Text("5".into())));
    }

    #[test]
    fn test_raw_value_push_promotes_to_many() {
        let mut value = raw("a");
        value.push("b".into());
        assert_eq!(value, RawValue::Many(vec!["a".into(), "b".into()]));
        assert_eq!(value.first(), Some("a"));
    }

    #[test]
    fn test_empty_many_coerces_as_empty_text() {
        let value = RawValue::Many(vec![]);
        assert_eq!(coerce(None, &value), Some(FilterValue::Text(String::new())));
    }
}
