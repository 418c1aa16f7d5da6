//! Lookup operator registry
//!
//! The fixed set of comparison/matching modes a query key may carry as a
//! `field__operator` suffix. Every field whitelist in the crate draws from
//! this one set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between a field name and its lookup operator in a query key
pub const LOOKUP_SEPARATOR: &str = "__";

/// A recognised lookup operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookup {
    /// Membership in a list of values
    In,
    /// Null check
    #[serde(rename = "isnull")]
    IsNull,
    /// Case-insensitive substring match
    #[serde(rename = "icontains")]
    IContains,
    /// Case-insensitive prefix match
    #[serde(rename = "istartswith")]
    IStartsWith,
    /// Case-insensitive suffix match
    #[serde(rename = "iendswith")]
    IEndsWith,
    /// Case-insensitive equality
    #[serde(rename = "iexact")]
    IExact,
    Gt,
    Lt,
    Gte,
    Lte,
    /// Inclusive two-bound range
    Range,
    Year,
    Month,
    Day,
    /// Day of week, 1 (Sunday) to 7 (Saturday)
    WeekDay,
    Hour,
    Minute,
}

impl Lookup {
    /// Every operator in the registry, in declaration order
    pub const ALL: [Lookup; 17] = [
        Lookup::In,
        Lookup::IsNull,
        Lookup::IContains,
        Lookup::IStartsWith,
        Lookup::IEndsWith,
        Lookup::IExact,
        Lookup::Gt,
        Lookup::Lt,
        Lookup::Gte,
        Lookup::Lte,
        Lookup::Range,
        Lookup::Year,
        Lookup::Month,
        Lookup::Day,
        Lookup::WeekDay,
        Lookup::Hour,
        Lookup::Minute,
    ];

    /// The query-string token for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Lookup::In => "in",
            Lookup::IsNull => "isnull",
            Lookup::IContains => "icontains",
            Lookup::IStartsWith => "istartswith",
            Lookup::IEndsWith => "iendswith",
            Lookup::IExact => "iexact",
            Lookup::Gt => "gt",
            Lookup::Lt => "lt",
            Lookup::Gte => "gte",
            Lookup::Lte => "lte",
            Lookup::Range => "range",
            Lookup::Year => "year",
            Lookup::Month => "month",
            Lookup::Day => "day",
            Lookup::WeekDay => "week_day",
            Lookup::Hour => "hour",
            Lookup::Minute => "minute",
        }
    }

    /// Parse a token, returning `None` for anything outside the registry
    pub fn parse(token: &str) -> Option<Lookup> {
        Self::ALL.iter().copied().find(|op| op.as_str() == token)
    }

    /// Calendar-unit extractors take an integer operand
    pub fn expects_integer(&self) -> bool {
        matches!(
            self,
            Lookup::Year
                | Lookup::Month
                | Lookup::Day
                | Lookup::WeekDay
                | Lookup::Hour
                | Lookup::Minute
        )
    }

    /// `in` and `range` take a comma-separated sequence
    pub fn expects_sequence(&self) -> bool {
        matches!(self, Lookup::In | Lookup::Range)
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether a token names a registered operator
pub fn is_known_operator(token: &str) -> bool {
    Lookup::parse(token).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_token_parses_back() {
        for op in Lookup::ALL {
            assert_eq!(Lookup::parse(op.as_str()), Some(op));
        }
    }

    #[test]
    fn test_unknown_tokens_rejected() {
        assert!(!is_known_operator("contains"));
        assert!(!is_known_operator("ICONTAINS"));
        assert!(!is_known_operator(""));
        assert!(!is_known_operator("exclude"));
    }

    #[test]
    fn test_known_tokens_accepted() {
        assert!(is_known_operator("in"));
        assert!(is_known_operator("week_day"));
        assert!(is_known_operator("istartswith"));
    }

    #[test]
    fn test_integer_operators() {
        assert!(Lookup::Year.expects_integer());
        assert!(Lookup::WeekDay.expects_integer());
        assert!(!Lookup::Gt.expects_integer());
        assert!(!Lookup::In.expects_integer());
    }

    #[test]
    fn test_serde_uses_query_tokens() {
        let json = serde_json::to_string(&Lookup::IStartsWith).unwrap();
        assert_eq!(json, "\"istartswith\"");
        let op: Lookup = serde_json::from_str("\"week_day\"").unwrap();
        assert_eq!(op, Lookup::WeekDay);
        let op: Lookup = serde_json::from_str("\"isnull\"").unwrap();
        assert_eq!(op, Lookup::IsNull);
    }
}
