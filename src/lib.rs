//! # Restaurant Choices
//!
//! A restaurant listing API whose list endpoints accept Django-style query
//! parameters (`field__lookup=value`) validated against a per-resource
//! whitelist.
//!
//! ## Features
//!
//! - **Field whitelist**: only configured fields and lookups become filters
//! - **Typed operands**: `in`/`range` lists, `isnull` booleans, calendar integers
//! - **Ordered validation steps**: search, exclude, limit, page, order, plus custom steps
//! - **Compact error reports**: one code per failed step under an error class
//! - **Configuration-Based**: controllers loadable from YAML
//! - **Soft Delete Support**: deleted rows are never listed
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restaurant_choices::prelude::*;
//!
//! let controller = ListController::new(restaurant_list_config())?;
//! let raw = RawQuery::from_pairs([("city__icontains", "aber"), ("order", "-city")]);
//!
//! let validation = controller.validate(&raw, false);
//! assert!(validation.is_valid());
//! let search = validation.cleaned_data().search.clone().unwrap_or_default();
//! ```

pub mod config;
pub mod core;
pub mod restaurants;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::Record,
        error::{ApiError, ConfigError, RequestError, StepFailure, StorageError, ValidationError},
        field::FieldValue,
        lookup::Lookup,
        query::{ListLimits, OrderPolicy, Ordering, PaginationMeta, RawQuery},
        store::QueryableStore,
    };

    // === Validation ===
    pub use crate::core::validation::{
        CleanedData, ErrorReport, FieldRule, FieldSpec, FilterExpr, FilterSet, FilterValue,
        ListController, RawValue, StepInput, StepResult, ValidatedQuery, Validation,
        ValidationStep, validators,
    };

    // === Config ===
    pub use crate::config::{ControllerConfig, ResourcesConfig, restaurant_list_config};

    // === Restaurants ===
    pub use crate::restaurants::{
        Country, InMemoryRestaurantStore, Restaurant, RestaurantDescriptor, RestaurantService,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === Server ===
    pub use crate::server::{ResourceDescriptor, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
}
