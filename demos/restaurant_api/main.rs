//! Restaurant list API
//!
//! Serves `GET /v1/restaurant/` over an in-memory store seeded with a few
//! restaurants. Set `RESTAURANT_CONFIG` to a YAML file to override the
//! built-in controller configuration.
//!
//! ```text
//! cargo run --example restaurant_api
//! curl 'http://127.0.0.1:3000/v1/restaurant/?userId=1&city__icontains=aber&order=-restaurantName'
//! ```

use anyhow::Result;
use chrono::NaiveTime;
use restaurant_choices::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,restaurant_choices=debug")),
        )
        .init();

    let config = match std::env::var("RESTAURANT_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading controller configuration from {}", path);
            ResourcesConfig::from_yaml_file(&path)?
        }
        Err(_) => ResourcesConfig::default_config(),
    };

    let store = InMemoryRestaurantStore::new();
    populate_test_data(&store)?;

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    ServerBuilder::new()
        .register(RestaurantDescriptor::new(store, &config)?)
        .serve(&addr)
        .await
}

/// Populate the store with test data
fn populate_test_data(store: &InMemoryRestaurantStore) -> Result<()> {
    let uk = store.add_country(Country::new(44, "United Kingdom").with_codes("GB", "GBR"))?;
    let us = store.add_country(Country::new(1, "United States").with_codes("US", "USA"))?;

    let late = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_default();

    let restaurants = [
        Restaurant::new(1, uk.clone(), "August Kitchen", "Aberdeen")
            .with_address("12 Union Street")
            .with_postcode("AB10 1XZ")
            .with_location(57.149453, -2.172841),
        Restaurant::new(2, uk.clone(), "Moonfish Cafe", "Aberdeen")
            .with_address("9 Correction Wynd")
            .with_postcode("AB10 1HP")
            .with_location(57.148012, -2.096301),
        Restaurant::new(3, uk, "The Silver Darling", "Aberdeen")
            .with_postcode("AB11 5DQ")
            .with_hours(late(12), late(23))
            .with_location(57.143993, -2.077514),
        Restaurant::new(4, us.clone(), "Augustine's", "Boston")
            .with_postcode("02108")
            .with_location(42.357603, -71.062862),
        Restaurant::new(5, us, "Night Owl Diner", "Boston")
            .with_hours(late(18), late(2))
            .with_location(42.351200, -71.055800),
    ];

    for restaurant in restaurants {
        store.add_restaurant(restaurant)?;
    }

    store.add_favorite(1, 3)?;
    store.add_blocklisted(1, 2)?;

    Ok(())
}
