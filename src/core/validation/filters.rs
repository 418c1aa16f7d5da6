//! Typed filter expressions
//!
//! The validated output of the search and exclude steps. Stores translate
//! these into their own query language; see
//! [`QueryableStore`](crate::core::store::QueryableStore).

use super::coerce::FilterValue;
use crate::core::lookup::{LOOKUP_SEPARATOR, Lookup};
use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

/// One accepted `field[__lookup] = value` condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpr {
    pub field: String,
    pub lookup: Option<Lookup>,
    pub value: FilterValue,
}

impl FilterExpr {
    pub fn new(field: impl Into<String>, lookup: Option<Lookup>, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            lookup,
            value,
        }
    }

    /// The flat key form, `field` or `field__lookup`
    pub fn key(&self) -> String {
        match self.lookup {
            Some(op) => format!("{}{}{}", self.field, LOOKUP_SEPARATOR, op.as_str()),
            None => self.field.clone(),
        }
    }
}

/// An ordered set of filter expressions keyed by [`FilterExpr::key`]
///
/// Inserting an expression whose key already exists replaces the earlier one
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    exprs: IndexMap<String, FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, expr: FilterExpr) {
        self.exprs.insert(expr.key(), expr);
    }

    pub fn get(&self, key: &str) -> Option<&FilterExpr> {
        self.exprs.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.exprs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterExpr> {
        self.exprs.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.exprs.keys().map(String::as_str)
    }

    /// Flat `key -> value` view
    pub fn to_kwargs(&self) -> IndexMap<String, FilterValue> {
        self.exprs
            .iter()
            .map(|(key, expr)| (key.clone(), expr.value.clone()))
            .collect()
    }
}

impl FromIterator<FilterExpr> for FilterSet {
    fn from_iter<I: IntoIterator<Item = FilterExpr>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for expr in iter {
            set.insert(expr);
        }
        set
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a FilterExpr;
    type IntoIter = indexmap::map::Values<'a, String, FilterExpr>;

    fn into_iter(self) -> Self::IntoIter {
        self.exprs.values()
    }
}

impl Serialize for FilterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.exprs.iter().map(|(key, expr)| (key, &expr.value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_with_and_without_lookup() {
        let bare = FilterExpr::new("city", None, FilterValue::Text("Leeds".into()));
        assert_eq!(bare.key(), "city");

        let suffixed = FilterExpr::new(
            "restaurantName",
            Some(Lookup::IContains),
            FilterValue::Text("cafe".into()),
        );
        assert_eq!(suffixed.key(), "restaurantName__icontains");
    }

    #[test]
    fn test_same_key_replaces() {
        let mut set = FilterSet::new();
        set.insert(FilterExpr::new("city", None, FilterValue::Text("a".into())));
        set.insert(FilterExpr::new("postcode", None, FilterValue::Text("b".into())));
        set.insert(FilterExpr::new("city", None, FilterValue::Text("c".into())));

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("city").unwrap().value, FilterValue::Text("c".into()));
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["city", "postcode"]);
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let set: FilterSet = [
            FilterExpr::new("idRestaurant", Some(Lookup::In), FilterValue::List(vec!["1".into()])),
            FilterExpr::new("postcode", Some(Lookup::IsNull), FilterValue::Bool(false)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            json!({"idRestaurant__in": ["1"], "postcode__isnull": false})
        );
    }
}
