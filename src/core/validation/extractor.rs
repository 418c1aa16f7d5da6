//! Axum extractor for validated list queries
//!
//! `ValidatedQuery` runs the state's [`ListController`] over the query string
//! before the request reaches the handler. The router state exposes its
//! controller through [`FromRef`].

use super::controller::{CleanedData, ListController};
use crate::core::error::{ApiError, RequestError, ValidationError};
use crate::core::query::RawQuery;
use axum::extract::{FromRef, FromRequestParts, Query};
use axum::http::request::Parts;

/// Axum extractor holding the validated query of a list endpoint
///
/// Rejects with `400` and the per-step error report when any validation
/// step fails.
///
/// # Usage
///
/// ```rust,ignore
/// impl FromRef<RestaurantState> for ListController {
///     fn from_ref(state: &RestaurantState) -> Self {
///         state.controller.clone()
///     }
/// }
///
/// pub async fn list_restaurants(
///     State(state): State<RestaurantState>,
///     query: ValidatedQuery,
/// ) -> Result<Json<Value>, ApiError> {
///     let search = query.cleaned.search.clone().unwrap_or_default();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedQuery {
    /// The query as received
    pub raw: RawQuery,
    /// Output of every validation step
    pub cleaned: CleanedData,
}

impl<S> FromRequestParts<S> for ValidatedQuery
where
    S: Send + Sync,
    ListController: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs): Query<Vec<(String, String)>> = Query::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                ApiError::Request(RequestError::InvalidParameter {
                    parameter: "query".to_string(),
                    value: e.body_text(),
                })
            })?;

        let raw = RawQuery::from_pairs(pairs);
        let controller = ListController::from_ref(state);
        let validation = controller.validate(&raw, false);

        if !validation.is_valid() {
            return Err(ApiError::Validation(ValidationError::StepErrors {
                error_class: controller.config().error_class.clone(),
                errors: validation.errors(),
            }));
        }

        Ok(Self {
            raw,
            cleaned: validation.into_cleaned_data(),
        })
    }
}
