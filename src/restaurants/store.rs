//! Restaurant service trait and its in-memory implementation

use super::model::{Country, Restaurant, UserBlocklistRestaurant, UserFavoriteRestaurant};
use crate::core::entity::Record;
use crate::core::query::Ordering;
use crate::core::store::QueryableStore;
use crate::core::validation::{FilterExpr, FilterSet, FilterValue};
use crate::storage::InMemoryStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;

/// Data access used by the restaurant list endpoint
#[async_trait]
pub trait RestaurantService: Send + Sync {
    /// Non-deleted restaurants matching every `search` expression and not
    /// matching the `exclude` expressions as a whole, sorted by `order`
    async fn search(
        &self,
        search: &FilterSet,
        exclude: &FilterSet,
        order: Option<&Ordering>,
    ) -> Result<Vec<Restaurant>>;

    /// Ids of the restaurants `user` marked as favourite
    async fn favorites(&self, user: i64) -> Result<HashSet<i64>>;

    /// Ids of the restaurants `user` never wants listed
    async fn blocklist(&self, user: i64) -> Result<HashSet<i64>>;
}

/// In-memory restaurant service for testing and development
#[derive(Clone, Default)]
pub struct InMemoryRestaurantStore {
    countries: InMemoryStore<Country>,
    restaurants: InMemoryStore<Restaurant>,
    favorites: InMemoryStore<UserFavoriteRestaurant>,
    blocklist: InMemoryStore<UserBlocklistRestaurant>,
}

impl InMemoryRestaurantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_country(&self, country: Country) -> Result<Country> {
        self.countries.insert(country)
    }

    pub fn add_restaurant(&self, restaurant: Restaurant) -> Result<Restaurant> {
        self.restaurants.insert(restaurant)
    }

    pub fn add_favorite(&self, user: i64, restaurant: i64) -> Result<UserFavoriteRestaurant> {
        self.favorites
            .insert_with(|id| UserFavoriteRestaurant::new(id, user, restaurant))
    }

    pub fn add_blocklisted(&self, user: i64, restaurant: i64) -> Result<UserBlocklistRestaurant> {
        self.blocklist
            .insert_with(|id| UserBlocklistRestaurant::new(id, user, restaurant))
    }

    pub fn get_restaurant(&self, id: i64) -> Result<Option<Restaurant>> {
        self.restaurants.get(id)
    }

    pub fn countries(&self) -> Result<Vec<Country>> {
        self.countries.list_active()
    }

    /// Soft delete: the restaurant stays stored but is no longer listed
    pub fn delete_restaurant(&self, id: i64) -> Result<Restaurant> {
        self.restaurants.modify(id, |r| {
            let now = Utc::now();
            r.deleted = Some(now);
            r.updated = now;
        })
    }

    pub fn remove_favorite(&self, user: i64, restaurant: i64) -> Result<()> {
        let rows = self.favorites.list_active()?;
        for row in rows
            .iter()
            .filter(|row| row.user == user && row.restaurant == restaurant)
        {
            self.favorites
                .modify(row.id(), |r| r.deleted = Some(Utc::now()))?;
        }
        Ok(())
    }
}

/// Active rows of `store` that belong to `user`, as restaurant ids
fn restaurant_ids_for<T, S>(store: &S, rows: Vec<T>, user: i64) -> Result<HashSet<i64>>
where
    T: Record,
    S: QueryableStore<T>,
{
    let by_user: FilterSet = [FilterExpr::new("user", None, FilterValue::Integer(user))]
        .into_iter()
        .collect();

    Ok(store
        .apply_filters(rows, &by_user)?
        .iter()
        .filter_map(|row| row.field_value("restaurant")?.as_integer())
        .collect())
}

#[async_trait]
impl RestaurantService for InMemoryRestaurantStore {
    async fn search(
        &self,
        search: &FilterSet,
        exclude: &FilterSet,
        order: Option<&Ordering>,
    ) -> Result<Vec<Restaurant>> {
        let active = self.restaurants.list_active()?;
        let matched = self.apply_filters(active, search)?;
        let kept = self.apply_exclude(matched, exclude)?;

        Ok(match order {
            Some(order) => self.apply_order(kept, order),
            None => kept,
        })
    }

    async fn favorites(&self, user: i64) -> Result<HashSet<i64>> {
        restaurant_ids_for(&self.favorites, self.favorites.list_active()?, user)
    }

    async fn blocklist(&self, user: i64) -> Result<HashSet<i64>> {
        restaurant_ids_for(&self.blocklist, self.blocklist.list_active()?, user)
    }
}

impl QueryableStore<Restaurant> for InMemoryRestaurantStore {
    fn list_all(&self) -> Result<Vec<Restaurant>> {
        self.restaurants.list_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StorageError;
    use crate::core::lookup::Lookup;

    fn store() -> InMemoryRestaurantStore {
        let store = InMemoryRestaurantStore::new();
        let uk = store.add_country(Country::new(44, "United Kingdom")).unwrap();
        let us = store.add_country(Country::new(1, "United States")).unwrap();
        store
            .add_restaurant(Restaurant::new(1, uk.clone(), "August", "Aberdeen"))
            .unwrap();
        store
            .add_restaurant(Restaurant::new(2, uk, "Moonfish", "Aberdeen"))
            .unwrap();
        store
            .add_restaurant(Restaurant::new(3, us, "Augustine", "Boston"))
            .unwrap();
        store
    }

    fn set(exprs: Vec<FilterExpr>) -> FilterSet {
        exprs.into_iter().collect()
    }

    #[tokio::test]
    async fn test_search_skips_deleted() {
        let store = store();
        store.delete_restaurant(2).unwrap();

        let by_id = Ordering::ascending("idRestaurant");
        let found = store
            .search(&FilterSet::new(), &FilterSet::new(), Some(&by_id))
            .await
            .unwrap();
        let ids: Vec<i64> = found.iter().map(|r| r.id_restaurant).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(store.get_restaurant(2).unwrap().unwrap().is_deleted());
    }

    #[tokio::test]
    async fn test_search_and_exclude() {
        let store = store();
        let search = set(vec![FilterExpr::new(
            "restaurantName",
            Some(Lookup::IStartsWith),
            FilterValue::Text("aug".into()),
        )]);
        let exclude = set(vec![FilterExpr::new(
            "country__countryName",
            Some(Lookup::IContains),
            FilterValue::Text("states".into()),
        )]);

        let found = store.search(&search, &exclude, None).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].restaurant_name, "August");
    }

    #[tokio::test]
    async fn test_search_invalid_operand_is_storage_error() {
        let store = store();
        let search = set(vec![FilterExpr::new(
            "idRestaurant",
            Some(Lookup::Gt),
            FilterValue::Text("abc".into()),
        )]);

        let err = store.search(&search, &FilterSet::new(), None).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::InvalidFilter { .. })
        ));
    }

    #[tokio::test]
    async fn test_favorites_and_blocklist_per_user() {
        let store = store();
        store.add_favorite(10, 1).unwrap();
        store.add_favorite(11, 2).unwrap();
        store.add_blocklisted(10, 3).unwrap();

        assert_eq!(store.favorites(10).await.unwrap(), HashSet::from([1]));
        assert_eq!(store.blocklist(10).await.unwrap(), HashSet::from([3]));
        assert!(store.blocklist(11).await.unwrap().is_empty());

        store.remove_favorite(10, 1).unwrap();
        assert!(store.favorites(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_favorites_are_all_kept() {
        let store = store();
        std::thread::scope(|scope| {
            for i in 0..8 {
                let store = store.clone();
                scope.spawn(move || {
                    for j in 0..50 {
                        store.add_favorite(1, i * 100 + j).unwrap();
                        store.add_blocklisted(2, i * 100 + j).unwrap();
                    }
                });
            }
        });

        assert_eq!(store.favorites(1).await.unwrap().len(), 400);
        assert_eq!(store.blocklist(2).await.unwrap().len(), 400);
    }

    #[tokio::test]
    async fn test_new_favorite_after_removal_keeps_other_rows() {
        let store = store();
        store.add_favorite(10, 1).unwrap();
        store.add_favorite(10, 2).unwrap();
        store.remove_favorite(10, 1).unwrap();
        store.add_favorite(10, 3).unwrap();

        assert_eq!(store.favorites(10).await.unwrap(), HashSet::from([2, 3]));
    }
}
