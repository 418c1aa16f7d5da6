//! ServerBuilder for fluent API to build HTTP servers

use super::registry::{ResourceDescriptor, ResourceRegistry};
use super::rest::RestExposure;
use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

const DEFAULT_SERVICE_NAME: &str = "restaurant-choices";

/// Builder for creating HTTP servers with registered resources
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .register(RestaurantDescriptor::new(store, &config)?)
///     .build()?;
/// ```
pub struct ServerBuilder {
    registry: ResourceRegistry,
    custom_routes: Vec<Router>,
    service_name: String,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            registry: ResourceRegistry::new(),
            custom_routes: Vec::new(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }

    /// Name reported by the health routes
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Add routes that are not list resources
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Register a resource and its routes
    pub fn register(mut self, descriptor: impl ResourceDescriptor + 'static) -> Self {
        tracing::debug!(resource = descriptor.resource_name(), "registering resource");
        self.registry.register(Box::new(descriptor));
        self
    }

    /// Build the final REST router
    ///
    /// Fails when no resource and no custom route was registered.
    pub fn build(self) -> Result<Router> {
        if self.registry.is_empty() && self.custom_routes.is_empty() {
            anyhow::bail!("No resources registered. Call .register()");
        }

        Ok(RestExposure::build_router(
            &self.registry,
            self.custom_routes,
            &self.service_name,
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self, addr: &str) -> Result<()> {
        let resources = self.registry.resource_names().join(", ");
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {} (resources: {})", addr, resources);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
