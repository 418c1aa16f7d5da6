//! REST exposure: health routes plus every registered resource

use super::registry::ResourceRegistry;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Resource routes
    /// - Custom routes
    ///
    /// Every route is wrapped in request tracing and a permissive CORS layer.
    pub fn build_router(
        registry: &ResourceRegistry,
        custom_routes: Vec<Router>,
        service_name: &str,
    ) -> Router {
        let mut app = Self::health_routes(service_name.to_string()).merge(registry.build_routes());

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    fn health_routes(service_name: String) -> Router {
        let health = move || {
            let service_name = service_name.clone();
            async move { Self::health_check(&service_name) }
        };

        Router::new()
            .route("/health", get(health.clone()))
            .route("/healthz", get(health))
    }

    fn health_check(service_name: &str) -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": service_name
        }))
    }
}
