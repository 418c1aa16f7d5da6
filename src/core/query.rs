//! Raw query parameters, pagination bounds and ordering

use super::validation::coerce::RawValue;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Inbound query parameters, in arrival order
///
/// Repeated keys collapse into a [`RawValue::Many`].
///
/// # Example
/// ```rust,ignore
/// // In handler:
/// pub async fn list(Query(pairs): Query<Vec<(String, String)>>) -> ... {
///     let raw = RawQuery::from_pairs(pairs);
/// }
///
/// // Usage:
/// GET /v1/restaurant/?restaurantName__icontains=cafe&limit=10&order=-city
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    params: IndexMap<String, RawValue>,
}

impl RawQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded `key=value` pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut query = Self::new();
        for (key, value) in pairs {
            query.append(key, value);
        }
        query
    }

    /// Add one occurrence of `key`
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.params.get_mut(&key) {
            Some(existing) => existing.push(value),
            None => {
                self.params.insert(key, RawValue::Single(value));
            }
        }
    }

    /// Set `key`, replacing any earlier occurrences
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.params.get(key)
    }

    /// First value of `key` as a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(RawValue::first)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawQuery {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Page-size bounds for a list resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl ListLimits {
    pub fn new(default_limit: usize, max_limit: usize) -> Self {
        Self {
            default_limit,
            max_limit,
        }
    }

    /// Resolve the requested page size
    ///
    /// Anything that is not an integer in `1..=max_limit` yields the default.
    pub fn clamp_limit(&self, raw: Option<&str>) -> usize {
        raw.and_then(|s| s.parse::<i64>().ok())
            .and_then(|n| usize::try_from(n).ok())
            .filter(|&n| n > 0 && n <= self.max_limit)
            .unwrap_or(self.default_limit)
    }

    /// Resolve the requested zero-based page; invalid or negative input is page 0
    pub fn clamp_page(raw: Option<&str>) -> usize {
        raw.and_then(|s| s.parse::<i64>().ok())
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0)
    }
}

/// A sort field with direction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ordering {
    pub field: String,
    pub descending: bool,
}

impl Ordering {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

impl Serialize for Ordering {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Sortable-field whitelist with optional field renames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPolicy {
    allowed: Vec<String>,
    aliases: IndexMap<String, String>,
}

impl OrderPolicy {
    /// `allowed` must be non-empty; [`ControllerConfig::check`] enforces this
    ///
    /// [`ControllerConfig::check`]: crate::config::ControllerConfig::check
    pub fn new(allowed: Vec<String>, aliases: IndexMap<String, String>) -> Self {
        Self { allowed, aliases }
    }

    /// The fallback ordering, ascending on the first allowed field
    pub fn default_ordering(&self) -> Ordering {
        Ordering::ascending(self.allowed.first().cloned().unwrap_or_default())
    }

    /// Resolve a requested `[-]field` against the whitelist
    ///
    /// Leading `-` marks descending order. A missing, empty or non-whitelisted
    /// field falls back to [`OrderPolicy::default_ordering`]. A whitelisted
    /// field is replaced by its alias when one is configured.
    pub fn resolve(&self, raw: Option<&str>) -> Ordering {
        let Some(raw) = raw.filter(|s| !s.is_empty()) else {
            return self.default_ordering();
        };

        let field = raw.trim_start_matches('-');
        let descending = field.len() != raw.len();

        if !self.allowed.iter().any(|allowed| allowed == field) {
            return self.default_ordering();
        }

        let field = self.aliases.get(field).map(String::as_str).unwrap_or(field);
        Ordering {
            field: field.to_string(),
            descending,
        }
    }
}

/// Pagination metadata returned alongside a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Zero-based page number
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Applied ordering, if any
    pub order: Option<Ordering>,

    /// Number of records matching the filters, before slicing
    pub total_records: usize,
}

impl PaginationMeta {
    pub fn new(page: usize, limit: usize, order: Option<Ordering>, total_records: usize) -> Self {
        Self {
            page,
            limit,
            order,
            total_records,
        }
    }

    /// Bounds of the current page as a `start..end` index range, clipped to
    /// `len`
    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.page.saturating_mul(self.limit).min(len);
        let end = start.saturating_add(self.limit).min(len);
        start..end
    }
}
