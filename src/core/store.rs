//! Store traits for filtering and sorting

use super::entity::Record;
use super::error::StorageError;
use super::query::Ordering;
use super::validation::FilterSet;
use crate::storage::in_memory;

/// Trait for stores that apply validated filter specifications
///
/// The provided methods evaluate filters in memory. A store backed by a
/// query engine overrides them to translate each
/// [`FilterExpr`](super::validation::FilterExpr) into its native query
/// language instead.
pub trait QueryableStore<T: Record>: Send + Sync {
    /// Get all records (unfiltered, unsorted, including soft-deleted ones)
    fn list_all(&self) -> anyhow::Result<Vec<T>>;

    /// Keep the records that match every expression in `filters`
    ///
    /// # Errors
    /// [`StorageError::InvalidFilter`] when an operand cannot be read as the
    /// field's type, e.g. `idRestaurant__gt=abc`.
    fn apply_filters(&self, data: Vec<T>, filters: &FilterSet) -> Result<Vec<T>, StorageError> {
        in_memory::retain_matching(data, filters, true)
    }

    /// Drop the records that match every expression in `exclude`
    fn apply_exclude(&self, data: Vec<T>, exclude: &FilterSet) -> Result<Vec<T>, StorageError> {
        if exclude.is_empty() {
            return Ok(data);
        }
        in_memory::retain_matching(data, exclude, false)
    }

    /// Sort records by one field
    fn apply_order(&self, data: Vec<T>, order: &Ordering) -> Vec<T> {
        in_memory::sort_records(data, order)
    }
}
