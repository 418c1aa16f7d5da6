//! Field whitelist resolution
//!
//! A [`FieldSpec`] declares which fields a resource may be filtered on and
//! which lookup operators each field accepts. Query keys that fall outside
//! the whitelist are not errors; [`FieldSpec::resolve`] simply returns `None`
//! and the caller drops the key.

use crate::core::lookup::{LOOKUP_SEPARATOR, Lookup};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Permitted operators for one whitelisted field
///
/// An empty operator list deserialises to [`FieldRule::EqualityOnly`]. This is
/// not the same as the field being absent from the whitelist: an equality-only
/// field accepts `field=value`, an absent field accepts nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Lookup>", into = "Vec<Lookup>")]
pub enum FieldRule {
    /// Bare `field=value` only; any suffixed operator is refused
    EqualityOnly,
    /// Bare equality plus the listed operators
    Lookups(IndexSet<Lookup>),
}

impl FieldRule {
    /// Whether `lookup` may be applied to this field
    pub fn permits(&self, lookup: Option<Lookup>) -> bool {
        match (self, lookup) {
            (_, None) => true,
            (FieldRule::EqualityOnly, Some(_)) => false,
            (FieldRule::Lookups(allowed), Some(op)) => allowed.contains(&op),
        }
    }
}

impl From<Vec<Lookup>> for FieldRule {
    fn from(ops: Vec<Lookup>) -> Self {
        if ops.is_empty() {
            FieldRule::EqualityOnly
        } else {
            FieldRule::Lookups(ops.into_iter().collect())
        }
    }
}

impl From<FieldRule> for Vec<Lookup> {
    fn from(rule: FieldRule) -> Self {
        match rule {
            FieldRule::EqualityOnly => Vec::new(),
            FieldRule::Lookups(ops) => ops.into_iter().collect(),
        }
    }
}

/// A query key that passed the whitelist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub field: String,
    pub lookup: Option<Lookup>,
}

/// Whitelist of filterable fields for one resource
///
/// # Example
///
/// ```rust,ignore
/// let spec = FieldSpec::new()
///     .field("restaurantName", [Lookup::IContains, Lookup::IStartsWith])
///     .equality_only("currency");
///
/// let key = spec.resolve("restaurantName__icontains").unwrap();
/// assert_eq!(key.lookup, Some(Lookup::IContains));
/// assert!(spec.resolve("restaurantName__gt").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSpec {
    fields: IndexMap<String, FieldRule>,
}

impl FieldSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whitelist a field with the given operators
    ///
    /// Passing no operators is equivalent to [`FieldSpec::equality_only`].
    pub fn field(mut self, name: &str, ops: impl IntoIterator<Item = Lookup>) -> Self {
        let rule = FieldRule::from(ops.into_iter().collect::<Vec<_>>());
        self.fields.insert(name.to_string(), rule);
        self
    }

    /// Whitelist a field for bare equality only
    pub fn equality_only(mut self, name: &str) -> Self {
        self.fields.insert(name.to_string(), FieldRule::EqualityOnly);
        self
    }

    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve a raw query key against the whitelist
    ///
    /// The trailing `__segment` is taken as the operator only when it is a
    /// registered [`Lookup`]; otherwise the whole key names the field.
    /// Returns `None` when the field is unknown or the operator is not
    /// permitted for it.
    pub fn resolve(&self, key: &str) -> Option<ResolvedKey> {
        let (field, lookup) = split_key(key);
        let rule = self.fields.get(field)?;
        if !rule.permits(lookup) {
            return None;
        }
        Some(ResolvedKey {
            field: field.to_string(),
            lookup,
        })
    }
}

/// Split `field__op` into its parts; keys without a registered trailing
/// operator are returned whole
fn split_key(key: &str) -> (&str, Option<Lookup>) {
    if let Some((head, tail)) = key.rsplit_once(LOOKUP_SEPARATOR)
        && let Some(op) = Lookup::parse(tail)
    {
        return (head, Some(op));
    }
    (key, None)
}
