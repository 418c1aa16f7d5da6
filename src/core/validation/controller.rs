//! List request validation
//!
//! A [`ListController`] runs the configured [`ValidationStep`]s over a
//! [`RawQuery`] and produces a [`Validation`]: the cleaned data every step
//! could determine, plus the error codes of the steps that failed. Steps do
//! not depend on each other; every configured step runs even after an
//! earlier one failed.

use super::coerce::{RawValue, coerce};
use super::fields::FieldSpec;
use super::filters::{FilterExpr, FilterSet};
use crate::config::ControllerConfig;
use crate::core::error::{ConfigError, StepFailure};
use crate::core::query::{ListLimits, OrderPolicy, Ordering, RawQuery};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Prefix that routes a query key to the exclude step
pub const EXCLUDE_PREFIX: &str = "exclude__";

/// A named validation step
///
/// The step name doubles as the query key it reads (`limit`, `page`, ...)
/// and as the key its errors are reported under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValidationStep {
    Search,
    Exclude,
    Limit,
    Page,
    Order,
    /// A step provided through [`ListController::with_step`]
    Custom(String),
}

impl ValidationStep {
    pub fn name(&self) -> &str {
        match self {
            ValidationStep::Search => "search",
            ValidationStep::Exclude => "exclude",
            ValidationStep::Limit => "limit",
            ValidationStep::Page => "page",
            ValidationStep::Order => "order",
            ValidationStep::Custom(name) => name,
        }
    }

    /// `search, exclude, limit, page, order`
    pub fn standard_order() -> Vec<ValidationStep> {
        vec![
            ValidationStep::Search,
            ValidationStep::Exclude,
            ValidationStep::Limit,
            ValidationStep::Page,
            ValidationStep::Order,
        ]
    }
}

impl From<&str> for ValidationStep {
    fn from(name: &str) -> Self {
        match name {
            "search" => ValidationStep::Search,
            "exclude" => ValidationStep::Exclude,
            "limit" => ValidationStep::Limit,
            "page" => ValidationStep::Page,
            "order" => ValidationStep::Order,
            other => ValidationStep::Custom(other.to_string()),
        }
    }
}

impl From<String> for ValidationStep {
    fn from(name: String) -> Self {
        ValidationStep::from(name.as_str())
    }
}

impl From<ValidationStep> for String {
    fn from(step: ValidationStep) -> Self {
        step.name().to_string()
    }
}

impl fmt::Display for ValidationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a custom step sees
pub struct StepInput<'a> {
    /// The trimmed first value of the step's own query key
    pub value: Option<&'a str>,
    /// The whole query, for steps that look at more than their own key
    pub query: &'a RawQuery,
}

/// Outcome of a custom step; `Ok(Some(v))` stores `v` in
/// [`CleanedData::custom`] under the step name
pub type StepResult = Result<Option<serde_json::Value>, StepFailure>;

/// A custom validation step
pub type StepFn = Arc<dyn Fn(&StepInput<'_>) -> StepResult + Send + Sync>;

/// Validated, coerced request data
///
/// A field is `None` when its step did not run (partial validation) or
/// failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanedData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<FilterSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<FilterSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Ordering>,
    #[serde(flatten)]
    pub custom: IndexMap<String, serde_json::Value>,
}

/// Error codes collected per step, in the order they were raised
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn push(&mut self, step: &str, code: impl Into<String>) {
        self.errors
            .entry(step.to_string())
            .or_default()
            .push(code.into());
    }

    pub fn has(&self, step: &str) -> bool {
        self.errors.contains_key(step)
    }

    pub fn get(&self, step: &str) -> Option<&[String]> {
        self.errors.get(step).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Every code for every step
    pub fn full(&self) -> IndexMap<String, Vec<String>> {
        self.errors.clone()
    }

    /// The first code of each step
    pub fn compact(&self) -> IndexMap<String, String> {
        self.errors
            .iter()
            .filter_map(|(step, codes)| codes.first().map(|code| (step.clone(), code.clone())))
            .collect()
    }
}

/// Errors as presented to API clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorReport {
    Full(IndexMap<String, Vec<String>>),
    Compact(IndexMap<String, String>),
}

impl ErrorReport {
    pub fn steps(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            ErrorReport::Full(errors) => Box::new(errors.keys().map(String::as_str)),
            ErrorReport::Compact(errors) => Box::new(errors.keys().map(String::as_str)),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ErrorReport::Full(errors) => errors.is_empty(),
            ErrorReport::Compact(errors) => errors.is_empty(),
        }
    }
}

/// Result of validating one request
#[derive(Debug, Clone)]
pub struct Validation {
    cleaned: CleanedData,
    errors: ValidationErrors,
    compact_errors: bool,
}

impl Validation {
    /// True when no step reported an error
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn cleaned_data(&self) -> &CleanedData {
        &self.cleaned
    }

    pub fn into_cleaned_data(self) -> CleanedData {
        self.cleaned
    }

    pub fn has_error(&self, step: &str) -> bool {
        self.errors.has(step)
    }

    /// The raw per-step code lists
    pub fn validation_errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Client-facing errors; one code per step when an error class is configured
    pub fn errors(&self) -> ErrorReport {
        if self.compact_errors {
            ErrorReport::Compact(self.errors.compact())
        } else {
            ErrorReport::Full(self.errors.full())
        }
    }
}

/// Validates list requests for one resource
///
/// Cheap to clone; the configuration is shared. Each call to
/// [`ListController::validate`] works on fresh output, so one controller
/// can serve concurrent requests.
///
/// # Example
///
/// ```rust,ignore
/// let controller = ListController::new(restaurant_list_config())?
///     .with_step("userId", |input| match input.value.map(str::parse::<i64>) {
///         Some(Ok(id)) => Ok(Some(id.into())),
///         _ => Err(StepFailure::new("USER_ID_REQUIRED")),
///     });
///
/// let validation = controller.validate(&raw, false);
/// let search = validation.cleaned_data().search.clone().unwrap_or_default();
/// ```
#[derive(Clone)]
pub struct ListController {
    config: Arc<ControllerConfig>,
    limits: ListLimits,
    order_policy: OrderPolicy,
    custom_steps: IndexMap<String, StepFn>,
}

impl fmt::Debug for ListController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListController")
            .field("config", &self.config)
            .field("custom_steps", &self.custom_steps.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ListController {
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.check()?;
        Ok(Self {
            limits: config.limits(),
            order_policy: config.order_policy(),
            config: Arc::new(config),
            custom_steps: IndexMap::new(),
        })
    }

    /// Register a step under `name`
    ///
    /// The step runs only if `name` appears in the configured validation
    /// order. Registering a built-in name (`order`, `limit`, ...) replaces the
    /// built-in step.
    pub fn with_step<F>(mut self, name: &str, step: F) -> Self
    where
        F: Fn(&StepInput<'_>) -> StepResult + Send + Sync + 'static,
    {
        self.custom_steps.insert(name.to_string(), Arc::new(step));
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn search_fields(&self) -> &FieldSpec {
        &self.config.search_fields
    }

    /// Run every configured step over `raw`
    ///
    /// With `partial`, a step whose key is absent from `raw` is skipped and
    /// its cleaned field stays unset.
    pub fn validate(&self, raw: &RawQuery, partial: bool) -> Validation {
        let mut cleaned = CleanedData::default();
        let mut errors = ValidationErrors::default();

        for step in &self.config.validation_order {
            let name = step.name();
            if partial && !raw.contains_key(name) {
                tracing::debug!(step = name, "partial validation, step skipped");
                continue;
            }

            let input = StepInput {
                value: raw.get_str(name).map(str::trim),
                query: raw,
            };

            let outcome = if let Some(custom) = self.custom_steps.get(name) {
                custom(&input).map(|value| {
                    if let Some(value) = value {
                        cleaned.custom.insert(name.to_string(), value);
                    }
                })
            } else {
                match self.run_builtin(step, &input, &mut cleaned) {
                    Some(outcome) => outcome,
                    None => {
                        tracing::debug!(step = name, "no validator registered, step skipped");
                        continue;
                    }
                }
            };

            if let Err(failure) = outcome {
                tracing::debug!(step = name, code = %failure.code, "validation step failed");
                errors.push(name, failure.code);
            }
        }

        Validation {
            cleaned,
            errors,
            compact_errors: self.config.error_class.is_some(),
        }
    }

    /// Run a built-in step; `None` for a custom name with no registered step
    fn run_builtin(
        &self,
        step: &ValidationStep,
        input: &StepInput<'_>,
        cleaned: &mut CleanedData,
    ) -> Option<Result<(), StepFailure>> {
        match step {
            ValidationStep::Search => {
                cleaned.search = Some(self.build_filters(input.query.iter()));
            }
            ValidationStep::Exclude => {
                let excluded = input
                    .query
                    .iter()
                    .filter_map(|(key, value)| Some((key.strip_prefix(EXCLUDE_PREFIX)?, value)));
                cleaned.exclude = Some(self.build_filters(excluded));
            }
            ValidationStep::Limit => {
                cleaned.limit = Some(self.limits.clamp_limit(input.value));
            }
            ValidationStep::Page => {
                cleaned.page = Some(ListLimits::clamp_page(input.value));
            }
            ValidationStep::Order => {
                cleaned.order = Some(self.order_policy.resolve(input.value));
            }
            ValidationStep::Custom(_) => return None,
        }
        Some(Ok(()))
    }

    /// Resolve and coerce each key; anything that fails either is dropped
    fn build_filters<'a>(&self, params: impl Iterator<Item = (&'a str, &'a RawValue)>) -> FilterSet {
        let mut filters = FilterSet::new();
        for (key, raw) in params {
            let Some(resolved) = self.config.search_fields.resolve(key) else {
                tracing::debug!(key, "query key not whitelisted, dropped");
                continue;
            };
            let Some(value) = coerce(resolved.lookup, raw) else {
                tracing::debug!(key, "query value could not be coerced, dropped");
                continue;
            };
            filters.insert(FilterExpr::new(resolved.field, resolved.lookup, value));
        }
        filters
    }
}
