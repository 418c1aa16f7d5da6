//! In-memory record store and filter evaluation for testing and development

use crate::core::entity::Record;
use crate::core::error::StorageError;
use crate::core::field::FieldValue;
use crate::core::lookup::Lookup;
use crate::core::query::Ordering;
use crate::core::store::QueryableStore;
use crate::core::validation::{FilterExpr, FilterSet, FilterValue};
use anyhow::{Result, anyhow};
use chrono::{Datelike, Timelike};
use std::cmp;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// In-memory store of records keyed by id
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryStore<T> {
    rows: Arc<RwLock<BTreeMap<i64, T>>>,
}

impl<T: Record> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Insert or replace a record
    pub fn insert(&self, row: T) -> Result<T> {
        let mut rows = self
            .rows
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        rows.insert(row.id(), row.clone());

        Ok(row)
    }

    /// Insert a record built from the next free id
    ///
    /// The id is allocated and the record stored under one write guard, so
    /// concurrent callers never receive the same id.
    pub fn insert_with(&self, build: impl FnOnce(i64) -> T) -> Result<T> {
        let mut rows = self
            .rows
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let next_id = rows.keys().next_back().map_or(1, |last| last + 1);
        let row = build(next_id);
        rows.insert(row.id(), row.clone());

        Ok(row)
    }

    pub fn get(&self, id: i64) -> Result<Option<T>> {
        let rows = self
            .rows
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(rows.get(&id).cloned())
    }

    /// Records that are not soft-deleted
    pub fn list_active(&self) -> Result<Vec<T>> {
        let rows = self
            .rows
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(rows.values().filter(|r| !r.is_deleted()).cloned().collect())
    }

    /// Apply `f` to the record with `id`, returning the updated record
    pub fn modify(&self, id: i64, f: impl FnOnce(&mut T)) -> Result<T> {
        let mut rows = self
            .rows
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let row = rows
            .get_mut(&id)
            .ok_or_else(|| anyhow!("{} {} not found", T::resource_name(), id))?;
        f(row);

        Ok(row.clone())
    }

    pub fn len(&self) -> Result<usize> {
        let rows = self
            .rows
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(rows.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> QueryableStore<T> for InMemoryStore<T> {
    fn list_all(&self) -> Result<Vec<T>> {
        let rows = self
            .rows
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(rows.values().cloned().collect())
    }
}

/// Keep records for which "matches every expression" equals `keep_matching`
pub fn retain_matching<T: Record>(
    data: Vec<T>,
    filters: &FilterSet,
    keep_matching: bool,
) -> Result<Vec<T>, StorageError> {
    let mut kept = Vec::with_capacity(data.len());
    for record in data {
        if matches_all(&record, filters)? == keep_matching {
            kept.push(record);
        }
    }
    Ok(kept)
}

/// True when `record` satisfies every expression; an empty set matches all
pub fn matches_all<T: Record>(record: &T, filters: &FilterSet) -> Result<bool, StorageError> {
    for expr in filters {
        if !matches(record, expr)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Evaluate one expression against a record
///
/// A field the record does not have never matches. A null field matches only
/// `isnull=true`.
pub fn matches<T: Record>(record: &T, expr: &FilterExpr) -> Result<bool, StorageError> {
    let Some(actual) = record.field_value(&expr.field) else {
        return Ok(false);
    };
    evaluate(&actual, expr.lookup, &expr.value).map_err(|message| StorageError::InvalidFilter {
        field: expr.key(),
        message,
    })
}

fn evaluate(actual: &FieldValue, lookup: Option<Lookup>, value: &FilterValue) -> Result<bool, String> {
    if lookup == Some(Lookup::IsNull) {
        let wanted = value
            .as_bool()
            .ok_or_else(|| "isnull expects a boolean".to_string())?;
        return Ok(actual.is_null() == wanted);
    }
    if actual.is_null() {
        return Ok(false);
    }

    match lookup {
        None => equals(actual, value),
        Some(op @ (Lookup::IContains | Lookup::IStartsWith | Lookup::IEndsWith | Lookup::IExact)) => {
            let needle = text_operand(value)?.to_lowercase();
            let haystack = display_text(actual).to_lowercase();
            Ok(match op {
                Lookup::IContains => haystack.contains(&needle),
                Lookup::IStartsWith => haystack.starts_with(&needle),
                Lookup::IEndsWith => haystack.ends_with(&needle),
                _ => haystack == needle,
            })
        }
        Some(op @ (Lookup::Gt | Lookup::Lt | Lookup::Gte | Lookup::Lte)) => {
            let operand = parse_operand(actual, text_operand(value)?)?;
            let Some(ord) = actual.compare(&operand) else {
                return Ok(false);
            };
            Ok(match op {
                Lookup::Gt => ord == cmp::Ordering::Greater,
                Lookup::Lt => ord == cmp::Ordering::Less,
                Lookup::Gte => ord != cmp::Ordering::Less,
                _ => ord != cmp::Ordering::Greater,
            })
        }
        Some(Lookup::In) => {
            let items = value
                .as_list()
                .ok_or_else(|| "in expects a list".to_string())?;
            for item in items {
                let operand = parse_operand(actual, item)?;
                if actual.compare(&operand) == Some(cmp::Ordering::Equal) {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Some(Lookup::Range) => {
            let bounds = value
                .as_list()
                .ok_or_else(|| "range expects a list".to_string())?;
            let [low, high] = bounds else {
                return Err(format!("range expects two bounds, got {}", bounds.len()));
            };
            let low = parse_operand(actual, low)?;
            let high = parse_operand(actual, high)?;
            Ok(actual.compare(&low).is_some_and(|o| o != cmp::Ordering::Less)
                && actual.compare(&high).is_some_and(|o| o != cmp::Ordering::Greater))
        }
        Some(op) => {
            let wanted = value
                .as_integer()
                .ok_or_else(|| format!("{} expects an integer", op))?;
            Ok(calendar_part(actual, op)? == wanted)
        }
    }
}

fn equals(actual: &FieldValue, value: &FilterValue) -> Result<bool, String> {
    match value {
        FilterValue::Text(text) => {
            let operand = parse_operand(actual, text)?;
            Ok(actual.compare(&operand) == Some(cmp::Ordering::Equal))
        }
        FilterValue::Bool(b) => Ok(match actual {
            FieldValue::Boolean(a) => a == b,
            FieldValue::String(s) => s == if *b { "True" } else { "False" },
            _ => false,
        }),
        FilterValue::Integer(i) => Ok(actual.compare(&FieldValue::Integer(*i)) == Some(cmp::Ordering::Equal)),
        FilterValue::List(_) => Err("a list is not a valid equality operand".to_string()),
    }
}

fn text_operand(value: &FilterValue) -> Result<&str, String> {
    value
        .as_text()
        .ok_or_else(|| "expected a text operand".to_string())
}

fn parse_operand(actual: &FieldValue, text: &str) -> Result<FieldValue, String> {
    actual
        .parse_like(text)
        .ok_or_else(|| format!("'{}' is not a valid value for this field", text))
}

fn display_text(actual: &FieldValue) -> String {
    match actual {
        FieldValue::String(s) => s.clone(),
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Float(f) => f.to_string(),
        FieldValue::Boolean(b) => b.to_string(),
        FieldValue::DateTime(dt) => dt.to_rfc3339(),
        FieldValue::Time(t) => t.to_string(),
        FieldValue::Null => String::new(),
    }
}

/// Extract a calendar unit; week days run 1 (Sunday) to 7 (Saturday)
fn calendar_part(actual: &FieldValue, op: Lookup) -> Result<i64, String> {
    let part = match (actual, op) {
        (FieldValue::DateTime(dt), Lookup::Year) => i64::from(dt.year()),
        (FieldValue::DateTime(dt), Lookup::Month) => i64::from(dt.month()),
        (FieldValue::DateTime(dt), Lookup::Day) => i64::from(dt.day()),
        (FieldValue::DateTime(dt), Lookup::WeekDay) => i64::from(dt.weekday().number_from_sunday()),
        (FieldValue::DateTime(dt), Lookup::Hour) => i64::from(dt.hour()),
        (FieldValue::DateTime(dt), Lookup::Minute) => i64::from(dt.minute()),
        (FieldValue::Time(t), Lookup::Hour) => i64::from(t.hour()),
        (FieldValue::Time(t), Lookup::Minute) => i64::from(t.minute()),
        _ => return Err(format!("{} cannot be extracted from this field", op)),
    };
    Ok(part)
}

/// Stable sort on one field; records without the field keep their relative order
pub fn sort_records<T: Record>(mut data: Vec<T>, order: &Ordering) -> Vec<T> {
    let key = |record: &T| {
        record
            .field_value(&order.field)
            .unwrap_or(FieldValue::Null)
    };
    data.sort_by(|a, b| {
        let ord = key(a).sort_cmp(&key(b));
        if order.descending { ord.reverse() } else { ord }
    });
    data
}
