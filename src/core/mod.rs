//! Core module containing the query validation types and traits

pub mod entity;
pub mod error;
pub mod field;
pub mod lookup;
pub mod query;
pub mod store;
pub mod validation;

pub use entity::Record;
pub use error::{ApiError, ConfigError, RequestError, StepFailure, StorageError, ValidationError};
pub use field::FieldValue;
pub use lookup::Lookup;
pub use query::{ListLimits, OrderPolicy, Ordering, PaginationMeta, RawQuery};
pub use store::QueryableStore;
