//! Resource registry for collecting list endpoints into one router

use axum::Router;
use indexmap::IndexMap;

/// Trait that describes how to build routes for a resource
///
/// Each resource (restaurant, country, ...) implements this trait to provide
/// its routes, already bound to their state.
pub trait ResourceDescriptor: Send + Sync {
    /// The resource name (singular, e.g., "restaurant")
    fn resource_name(&self) -> &str;

    /// Build the routes for this resource
    fn build_routes(&self) -> Router;
}

/// Registry for all resources served by the application
#[derive(Default)]
pub struct ResourceRegistry {
    descriptors: IndexMap<String, Box<dyn ResourceDescriptor>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: IndexMap::new(),
        }
    }

    /// Register a resource descriptor
    ///
    /// A descriptor with the same resource name replaces the earlier one.
    pub fn register(&mut self, descriptor: Box<dyn ResourceDescriptor>) {
        let name = descriptor.resource_name().to_string();
        self.descriptors.insert(name, descriptor);
    }

    /// Merge the routes of every registered resource
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Registered resource names, in registration order
    pub fn resource_names(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    struct MockDescriptor {
        name: String,
        path: &'static str,
    }

    impl MockDescriptor {
        fn new(name: &str, path: &'static str) -> Self {
            Self {
                name: name.to_string(),
                path,
            }
        }
    }

    impl ResourceDescriptor for MockDescriptor {
        fn resource_name(&self) -> &str {
            &self.name
        }

        fn build_routes(&self) -> Router {
            Router::new().route(self.path, get(|| async { "ok" }))
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ResourceRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.resource_names().is_empty());
    }

    #[test]
    fn test_register_keeps_order() {
        let mut registry = ResourceRegistry::new();
        registry.register(Box::new(MockDescriptor::new("restaurant", "/v1/restaurant/")));
        registry.register(Box::new(MockDescriptor::new("country", "/v1/country/")));
        assert_eq!(registry.resource_names(), vec!["restaurant", "country"]);
    }

    #[test]
    fn test_register_duplicate_replaces() {
        let mut registry = ResourceRegistry::new();
        registry.register(Box::new(MockDescriptor::new("restaurant", "/v1/restaurant/")));
        registry.register(Box::new(MockDescriptor::new("restaurant", "/v2/restaurant/")));
        assert_eq!(registry.resource_names().len(), 1);
    }

    #[test]
    fn test_build_routes_with_resources() {
        let mut registry = ResourceRegistry::new();
        registry.register(Box::new(MockDescriptor::new("restaurant", "/v1/restaurant/")));
        registry.register(Box::new(MockDescriptor::new("country", "/v1/country/")));
        let _router = registry.build_routes();
    }
}
