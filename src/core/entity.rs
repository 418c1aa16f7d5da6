//! Record trait for resources exposed through list endpoints

use super::field::FieldValue;
use chrono::{DateTime, Utc};

/// A stored row that can be filtered and sorted by field name.
///
/// All records carry soft-delete timestamps:
/// - created: Creation timestamp
/// - updated: Last modification timestamp
/// - deleted: Soft deletion timestamp (optional)
pub trait Record: Clone + Send + Sync + 'static {
    /// The resource name used in configuration and URLs (e.g., "restaurant")
    fn resource_name() -> &'static str;

    /// Primary key
    fn id(&self) -> i64;

    fn created(&self) -> DateTime<Utc>;

    fn updated(&self) -> DateTime<Utc>;

    /// Soft deletion timestamp
    fn deleted(&self) -> Option<DateTime<Utc>>;

    /// Value of a field by name; `None` when the record has no such field
    ///
    /// Related fields use the same `__` path syntax as query keys, e.g.
    /// `country__countryName`.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Check if the record has been soft-deleted
    fn is_deleted(&self) -> bool {
        self.deleted().is_some()
    }
}
