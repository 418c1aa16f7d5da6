//! Query validation and filter construction
//!
//! This module turns arbitrary HTTP query parameters into a validated filter
//! specification plus pagination and ordering, against a per-resource
//! whitelist of fields and lookup operators.
//!
//! - [`fields`]: which `field[__lookup]` keys a resource accepts
//! - [`coerce`]: typed operands for each lookup
//! - [`filters`]: the typed filter expressions handed to a store
//! - [`controller`]: the step-by-step request validator
//! - [`validators`]: reusable custom steps
//! - [`extractor`]: axum integration

pub mod coerce;
pub mod controller;
pub mod extractor;
pub mod fields;
pub mod filters;
pub mod validators;

pub use coerce::{FilterValue, RawValue};
pub use controller::{
    CleanedData, ErrorReport, ListController, StepFn, StepInput, StepResult, Validation,
    ValidationErrors, ValidationStep,
};
pub use extractor::ValidatedQuery;
pub use fields::{FieldRule, FieldSpec, ResolvedKey};
pub use filters::{FilterExpr, FilterSet};
