//! The restaurant list resource
//!
//! `GET /v1/restaurant/?userId=..` lists the non-deleted restaurants matching
//! the validated query, split into the user's favourites and the remaining
//! restaurants minus the user's blocklist.

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod store;

pub use descriptor::RestaurantDescriptor;
pub use handlers::{RestaurantListResponse, RestaurantState, list_restaurants};
pub use model::{Country, Restaurant, UserBlocklistRestaurant, UserFavoriteRestaurant};
pub use store::{InMemoryRestaurantStore, RestaurantService};
