//! Restaurant HTTP handlers

use super::model::Restaurant;
use super::store::RestaurantService;
use crate::core::error::{ApiError, RequestError, StorageError, ValidationError};
use crate::core::lookup::Lookup;
use crate::core::query::{PaginationMeta, RawQuery};
use crate::core::validation::{FilterExpr, FilterValue, ListController, ValidatedQuery};
use axum::Json;
use axum::extract::{FromRef, State};
use serde::Serialize;
use std::sync::Arc;

/// Code returned when the store rejects a whitelisted filter
pub const LIST_ERROR_CODE: &str = "Restaurant List Error";

const LIST_ERROR_MESSAGE: &str = "check the search fields in parms";

/// State shared by the restaurant handlers
#[derive(Clone)]
pub struct RestaurantState {
    pub service: Arc<dyn RestaurantService>,
    pub controller: ListController,
}

impl FromRef<RestaurantState> for ListController {
    fn from_ref(state: &RestaurantState) -> Self {
        state.controller.clone()
    }
}

/// The two lists of one page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantContent {
    pub favorite_restaurants: Vec<Restaurant>,
    pub restaurants: Vec<Restaurant>,
}

/// Response body of `GET /v1/restaurant/`
#[derive(Debug, Serialize)]
pub struct RestaurantListResponse {
    pub content: RestaurantContent,
    #[serde(rename = "_metadata")]
    pub metadata: PaginationMeta,
}

/// List restaurants for a user
///
/// Favourites come first. Blocklisted restaurants are never listed unless the
/// user also marked them as favourite. Pagination runs over the favourites
/// followed by the remaining restaurants; `totalRecords` counts both.
pub async fn list_restaurants(
    State(state): State<RestaurantState>,
    query: ValidatedQuery,
) -> Result<Json<RestaurantListResponse>, ApiError> {
    let user = user_id(&query.raw)?;

    let mut search = query.cleaned.search.clone().unwrap_or_default();
    if let Some(country) = query.raw.get_str("country") {
        search.insert(FilterExpr::new(
            "country__countryName",
            Some(Lookup::IContains),
            FilterValue::Text(country.to_string()),
        ));
    }
    let exclude = query.cleaned.exclude.clone().unwrap_or_default();
    let order = query.cleaned.order.clone();

    let matched = state
        .service
        .search(&search, &exclude, order.as_ref())
        .await
        .map_err(search_error)?;
    let favorites = state.service.favorites(user).await?;
    let blocklist = state.service.blocklist(user).await?;

    let (favorite_restaurants, others): (Vec<_>, Vec<_>) = matched
        .into_iter()
        .partition(|r| favorites.contains(&r.id_restaurant));
    let restaurants: Vec<_> = others
        .into_iter()
        .filter(|r| !blocklist.contains(&r.id_restaurant))
        .collect();

    let limit = query
        .cleaned
        .limit
        .unwrap_or(state.controller.config().default_list_limit);
    let page = query.cleaned.page.unwrap_or(0);
    let total = favorite_restaurants.len() + restaurants.len();
    let metadata = PaginationMeta::new(page, limit, order, total);

    tracing::debug!(
        user,
        filters = search.len(),
        total,
        page,
        limit,
        "restaurant list"
    );

    let content = paginate(favorite_restaurants, restaurants, &metadata);
    Ok(Json(RestaurantListResponse { content, metadata }))
}

fn user_id(raw: &RawQuery) -> Result<i64, RequestError> {
    let value = raw
        .get_str("userId")
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RequestError::MissingParameter {
            parameter: "userId".to_string(),
        })?;

    value.parse().map_err(|_| RequestError::InvalidParameter {
        parameter: "userId".to_string(),
        value: value.to_string(),
    })
}

fn search_error(err: anyhow::Error) -> ApiError {
    match err.downcast::<StorageError>() {
        Ok(StorageError::InvalidFilter { field, message }) => {
            tracing::debug!(%field, %message, "store rejected filter");
            ApiError::Validation(ValidationError::InvalidFilter {
                error_class: Some(LIST_ERROR_CODE.to_string()),
                message: LIST_ERROR_MESSAGE.to_string(),
            })
        }
        Ok(other) => {
            tracing::warn!(error = %other, "restaurant search failed");
            ApiError::Storage(other)
        }
        Err(err) => {
            tracing::warn!(error = %err, "restaurant search failed");
            ApiError::from(err)
        }
    }
}

/// Slice the page out of `favorites ++ others`, keeping the two lists apart
fn paginate(
    favorites: Vec<Restaurant>,
    others: Vec<Restaurant>,
    metadata: &PaginationMeta,
) -> RestaurantContent {
    let window = metadata.window(favorites.len() + others.len());
    let split = favorites.len();

    let favorite_restaurants = favorites
        .into_iter()
        .skip(window.start)
        .take(window.end.min(split).saturating_sub(window.start))
        .collect();
    let restaurants = others
        .into_iter()
        .skip(window.start.saturating_sub(split))
        .take(window.end.saturating_sub(window.start.max(split)))
        .collect();

    RestaurantContent {
        favorite_restaurants,
        restaurants,
    }
}
