//! Controller configuration loading and management

use crate::core::error::ConfigError;
use crate::core::lookup::Lookup;
use crate::core::query::{ListLimits, OrderPolicy};
use crate::core::validation::{FieldSpec, ValidationStep};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn default_list_limit() -> usize {
    50
}

fn default_max_list_limit() -> usize {
    100
}

/// Per-resource configuration for a [`ListController`]
///
/// [`ListController`]: crate::core::validation::ListController
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Page size used when `limit` is absent or out of range
    #[serde(default = "default_list_limit")]
    pub default_list_limit: usize,

    /// Largest page size a client may request
    #[serde(default = "default_max_list_limit")]
    pub max_list_limit: usize,

    /// Filterable fields and their permitted lookups
    #[serde(default)]
    pub search_fields: FieldSpec,

    /// Steps run by `validate`, in order
    #[serde(default)]
    pub validation_order: Vec<ValidationStep>,

    /// Sortable fields; the first one is the default ordering
    pub allowed_ordering: Vec<String>,

    /// Renames applied to an accepted ordering field
    #[serde(default)]
    pub ordering_aliases: IndexMap<String, String>,

    /// Error taxonomy; when set, error reports carry one code per step
    #[serde(default)]
    pub error_class: Option<String>,
}

impl ControllerConfig {
    /// Start a configuration with default limits and the standard step order
    pub fn new<S: Into<String>>(allowed_ordering: impl IntoIterator<Item = S>) -> Self {
        Self {
            default_list_limit: default_list_limit(),
            max_list_limit: default_max_list_limit(),
            search_fields: FieldSpec::new(),
            validation_order: ValidationStep::standard_order(),
            allowed_ordering: allowed_ordering.into_iter().map(Into::into).collect(),
            ordering_aliases: IndexMap::new(),
            error_class: None,
        }
    }

    pub fn with_limits(mut self, default_list_limit: usize, max_list_limit: usize) -> Self {
        self.default_list_limit = default_list_limit;
        self.max_list_limit = max_list_limit;
        self
    }

    pub fn with_search_fields(mut self, fields: FieldSpec) -> Self {
        self.search_fields = fields;
        self
    }

    pub fn with_validation_order(mut self, order: impl IntoIterator<Item = ValidationStep>) -> Self {
        self.validation_order = order.into_iter().collect();
        self
    }

    pub fn with_ordering_alias(mut self, field: &str, replacement: &str) -> Self {
        self.ordering_aliases
            .insert(field.to_string(), replacement.to_string());
        self
    }

    pub fn with_error_class(mut self, error_class: impl Into<String>) -> Self {
        self.error_class = Some(error_class.into());
        self
    }

    pub fn limits(&self) -> ListLimits {
        ListLimits::new(self.default_list_limit, self.max_list_limit)
    }

    pub fn order_policy(&self) -> OrderPolicy {
        OrderPolicy::new(self.allowed_ordering.clone(), self.ordering_aliases.clone())
    }

    /// Reject configurations the validation steps cannot honour
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.allowed_ordering.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "allowed_ordering".to_string(),
                message: "at least one ordering field is required".to_string(),
            });
        }
        if self.max_list_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_list_limit".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.default_list_limit == 0 || self.default_list_limit > self.max_list_limit {
            return Err(ConfigError::InvalidValue {
                field: "default_list_limit".to_string(),
                message: format!("must be within 1..={}", self.max_list_limit),
            });
        }
        Ok(())
    }
}

/// Controller configurations for every list resource, keyed by resource name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcesConfig {
    pub resources: IndexMap<String, ControllerConfig>,
}

impl ResourcesConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("{}: {}", path, e),
        })?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError {
                file: Some(path.to_string()),
                message,
            },
            other => other,
        })
    }

    /// Load configuration from a YAML string
    ///
    /// Every resource is checked before the configuration is returned.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        for resource in config.resources.values() {
            resource.check()?;
        }
        Ok(config)
    }

    pub fn get(&self, resource: &str) -> Result<&ControllerConfig, ConfigError> {
        self.resources
            .get(resource)
            .ok_or_else(|| ConfigError::UnknownResource {
                resource: resource.to_string(),
            })
    }

    /// The built-in configuration for this service's resources
    pub fn default_config() -> Self {
        Self {
            resources: IndexMap::from([("restaurant".to_string(), restaurant_list_config())]),
        }
    }
}

/// List configuration for the restaurant collection
pub fn restaurant_list_config() -> ControllerConfig {
    let text_lookups = [
        Lookup::In,
        Lookup::IsNull,
        Lookup::IContains,
        Lookup::IStartsWith,
        Lookup::IEndsWith,
    ];

    ControllerConfig::new(["idRestaurant", "restaurantName", "city", "postcode"])
        .with_limits(50, 100)
        .with_search_fields(
            FieldSpec::new()
                .field(
                    "idRestaurant",
                    [
                        Lookup::In,
                        Lookup::Gt,
                        Lookup::Lt,
                        Lookup::Gte,
                        Lookup::Lte,
                        Lookup::Range,
                    ],
                )
                .field("restaurantName", text_lookups)
                .field("city", text_lookups)
                .field("postcode", text_lookups),
        )
        .with_error_class("Restaurant List Errors")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResourcesConfig::default_config();
        let restaurant = config.get("restaurant").unwrap();

        assert_eq!(restaurant.default_list_limit, 50);
        assert_eq!(restaurant.max_list_limit, 100);
        assert_eq!(restaurant.allowed_ordering[0], "idRestaurant");
        assert_eq!(restaurant.validation_order, ValidationStep::standard_order());
        assert!(restaurant.check().is_ok());
    }

    #[test]
    fn test_unknown_resource() {
        let config = ResourcesConfig::default_config();
        assert!(matches!(
            config.get("country"),
            Err(ConfigError::UnknownResource { .. })
        ));
    }

    #[test]
    fn test_yaml_serialization() {
        let config = ResourcesConfig::default_config();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = ResourcesConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.get("restaurant").unwrap(), config.get("restaurant").unwrap());
    }

    #[test]
    fn test_yaml_defaults() {
        let yaml = r#"
resources:
  country:
    allowed_ordering: [countryName, idCountry]
    search_fields:
      countryName: [icontains]
      a2Code: []
    validation_order: [search, limit, order]
"#;
        let config = ResourcesConfig::from_yaml_str(yaml).unwrap();
        let country = config.get("country").unwrap();
        assert_eq!(country.default_list_limit, 50);
        assert_eq!(country.max_list_limit, 100);
        assert_eq!(country.error_class, None);
        assert_eq!(country.validation_order.len(), 3);
        assert!(country.search_fields.resolve("a2Code__icontains").is_none());
    }

    #[test]
    fn test_empty_ordering_rejected() {
        let yaml = "resources:\n  bad:\n    allowed_ordering: []\n";
        assert!(matches!(
            ResourcesConfig::from_yaml_str(yaml),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_default_above_max_rejected() {
        let config = ControllerConfig::new(["id"]).with_limits(200, 100);
        assert!(config.check().is_err());
    }
}
