//! Restaurant resource descriptor

use super::handlers::{RestaurantState, list_restaurants};
use super::store::RestaurantService;
use crate::config::ResourcesConfig;
use crate::core::error::ConfigError;
use crate::core::validation::ListController;
use crate::server::ResourceDescriptor;
use axum::{Router, routing::get};
use std::sync::Arc;

/// Serves `GET /v1/restaurant/` from a [`RestaurantService`]
pub struct RestaurantDescriptor {
    state: RestaurantState,
}

impl RestaurantDescriptor {
    /// Build the descriptor with the `restaurant` entry of `config`
    pub fn new(
        service: impl RestaurantService + 'static,
        config: &ResourcesConfig,
    ) -> Result<Self, ConfigError> {
        let controller = ListController::new(config.get("restaurant")?.clone())?;
        Ok(Self::with_controller(Arc::new(service), controller))
    }

    pub fn with_controller(service: Arc<dyn RestaurantService>, controller: ListController) -> Self {
        Self {
            state: RestaurantState {
                service,
                controller,
            },
        }
    }
}

impl ResourceDescriptor for RestaurantDescriptor {
    fn resource_name(&self) -> &str {
        "restaurant"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/v1/restaurant/", get(list_restaurants))
            .route("/v1/restaurant", get(list_restaurants))
            .with_state(self.state.clone())
    }
}
