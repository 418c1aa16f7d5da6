//! Restaurant, country and per-user preference records

use crate::core::entity::Record;
use crate::core::field::FieldValue;
use crate::core::lookup::LOOKUP_SEPARATOR;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A country restaurants belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id_country: i64,
    pub a2_code: Option<String>,
    pub a3_code: Option<String>,
    pub country_name: String,
    pub phone_prefix: Option<i64>,
    pub id_flag: Option<i64>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(default, skip_serializing)]
    pub deleted: Option<DateTime<Utc>>,
}

impl Country {
    pub fn new(id_country: i64, country_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id_country,
            a2_code: None,
            a3_code: None,
            country_name: country_name.into(),
            phone_prefix: None,
            id_flag: None,
            created: now,
            updated: now,
            deleted: None,
        }
    }

    pub fn with_codes(mut self, a2: &str, a3: &str) -> Self {
        self.a2_code = Some(a2.to_string());
        self.a3_code = Some(a3.to_string());
        self
    }
}

impl Record for Country {
    fn resource_name() -> &'static str {
        "country"
    }

    fn id(&self) -> i64 {
        self.id_country
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    fn deleted(&self) -> Option<DateTime<Utc>> {
        self.deleted
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        let value = match field {
            "idCountry" => FieldValue::Integer(self.id_country),
            "a2Code" => self.a2_code.clone().into(),
            "a3Code" => self.a3_code.clone().into(),
            "countryName" => FieldValue::from(self.country_name.as_str()),
            "phonePrefix" => self.phone_prefix.map_or(FieldValue::Null, FieldValue::Integer),
            "idFlag" => self.id_flag.map_or(FieldValue::Null, FieldValue::Integer),
            "created" => FieldValue::DateTime(self.created),
            "updated" => FieldValue::DateTime(self.updated),
            "deleted" => self.deleted.into(),
            _ => return None,
        };
        Some(value)
    }
}

/// A restaurant listed by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id_restaurant: i64,
    pub country: Country,
    pub restaurant_name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub address3: Option<String>,
    pub city: String,
    pub postcode: Option<String>,
    /// Free-form phone book, e.g. `{"main": "+44 1224 000000"}`
    pub phones: Value,
    pub email: Option<String>,
    pub website: Option<String>,
    pub vat_number: Option<String>,
    pub currency: Option<String>,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub latitude: f64,
    pub longitude: f64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(default, skip_serializing)]
    pub deleted: Option<DateTime<Utc>>,
}

impl Restaurant {
    /// A restaurant open 09:00 to 22:00 with no optional details
    pub fn new(
        id_restaurant: i64,
        country: Country,
        restaurant_name: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id_restaurant,
            country,
            restaurant_name: restaurant_name.into(),
            address1: String::new(),
            address2: None,
            address3: None,
            city: city.into(),
            postcode: None,
            phones: Value::Object(Default::default()),
            email: None,
            website: None,
            vat_number: None,
            currency: None,
            opening_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            closing_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            latitude: 0.0,
            longitude: 0.0,
            created: now,
            updated: now,
            deleted: None,
        }
    }

    pub fn with_postcode(mut self, postcode: &str) -> Self {
        self.postcode = Some(postcode.to_string());
        self
    }

    pub fn with_address(mut self, address1: &str) -> Self {
        self.address1 = address1.to_string();
        self
    }

    pub fn with_hours(mut self, opening_time: NaiveTime, closing_time: NaiveTime) -> Self {
        self.opening_time = opening_time;
        self.closing_time = closing_time;
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }
}

impl Record for Restaurant {
    fn resource_name() -> &'static str {
        "restaurant"
    }

    fn id(&self) -> i64 {
        self.id_restaurant
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    fn deleted(&self) -> Option<DateTime<Utc>> {
        self.deleted
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        if let Some(("country", related)) = field.split_once(LOOKUP_SEPARATOR) {
            return self.country.field_value(related);
        }

        let value = match field {
            "idRestaurant" => FieldValue::Integer(self.id_restaurant),
            "country" => FieldValue::Integer(self.country.id_country),
            "restaurantName" => FieldValue::from(self.restaurant_name.as_str()),
            "address1" => FieldValue::from(self.address1.as_str()),
            "address2" => self.address2.clone().into(),
            "address3" => self.address3.clone().into(),
            "city" => FieldValue::from(self.city.as_str()),
            "postcode" => self.postcode.clone().into(),
            "email" => self.email.clone().into(),
            "website" => self.website.clone().into(),
            "vatNumber" => self.vat_number.clone().into(),
            "currency" => self.currency.clone().into(),
            "openingTime" => FieldValue::Time(self.opening_time),
            "closingTime" => FieldValue::Time(self.closing_time),
            "latitude" => FieldValue::Float(self.latitude),
            "longitude" => FieldValue::Float(self.longitude),
            "created" => FieldValue::DateTime(self.created),
            "updated" => FieldValue::DateTime(self.updated),
            "deleted" => self.deleted.into(),
            _ => return None,
        };
        Some(value)
    }
}

/// Implements [`Record`] for a user-to-restaurant preference row
macro_rules! user_restaurant_record {
    ($name:ident, $id_field:ident, $id_key:literal, $resource:literal) => {
        impl $name {
            pub fn new($id_field: i64, user: i64, restaurant: i64) -> Self {
                let now = Utc::now();
                Self {
                    $id_field,
                    restaurant,
                    user,
                    created: now,
                    updated: now,
                    deleted: None,
                }
            }
        }

        impl Record for $name {
            fn resource_name() -> &'static str {
                $resource
            }

            fn id(&self) -> i64 {
                self.$id_field
            }

            fn created(&self) -> DateTime<Utc> {
                self.created
            }

            fn updated(&self) -> DateTime<Utc> {
                self.updated
            }

            fn deleted(&self) -> Option<DateTime<Utc>> {
                self.deleted
            }

            fn field_value(&self, field: &str) -> Option<FieldValue> {
                let value = match field {
                    $id_key => FieldValue::Integer(self.$id_field),
                    "restaurant" => FieldValue::Integer(self.restaurant),
                    "user" => FieldValue::Integer(self.user),
                    "created" => FieldValue::DateTime(self.created),
                    "updated" => FieldValue::DateTime(self.updated),
                    "deleted" => self.deleted.into(),
                    _ => return None,
                };
                Some(value)
            }
        }
    };
}

/// A restaurant a user has marked as favourite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFavoriteRestaurant {
    pub id_user_favorite: i64,
    pub restaurant: i64,
    pub user: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub deleted: Option<DateTime<Utc>>,
}

/// A restaurant a user never wants listed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBlocklistRestaurant {
    pub id_user_blocklist: i64,
    pub restaurant: i64,
    pub user: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub deleted: Option<DateTime<Utc>>,
}

user_restaurant_record!(
    UserFavoriteRestaurant,
    id_user_favorite,
    "idUserFavorite",
    "user_favorite_restaurant"
);
user_restaurant_record!(
    UserBlocklistRestaurant,
    id_user_blocklist,
    "idUserBlocklist",
    "user_blocklist_restaurant"
);

#[cfg(test)]
mod tests {
    use super::*;

    fn aberdeen() -> Restaurant {
        Restaurant::new(7, Country::new(44, "United Kingdom"), "August Kitchen", "Aberdeen")
            .with_postcode("AB10 1XZ")
    }

    #[test]
    fn test_serializes_camel_case_with_nested_country() {
        let json = serde_json::to_value(aberdeen()).unwrap();
        assert_eq!(json["idRestaurant"], 7);
        assert_eq!(json["restaurantName"], "August Kitchen");
        assert_eq!(json["country"]["countryName"], "United Kingdom");
        assert!(json.get("deleted").is_none());
    }

    #[test]
    fn test_field_value_follows_country_relation() {
        let restaurant = aberdeen();
        assert_eq!(
            restaurant.field_value("country__countryName"),
            Some(FieldValue::from("United Kingdom"))
        );
        assert_eq!(restaurant.field_value("country"), Some(FieldValue::Integer(44)));
        assert_eq!(restaurant.field_value("country__unknown"), None);
        assert_eq!(restaurant.field_value("address2"), Some(FieldValue::Null));
    }

    #[test]
    fn test_preference_rows() {
        let favorite = UserFavoriteRestaurant::new(1, 10, 7);
        assert_eq!(favorite.id(), 1);
        assert_eq!(favorite.field_value("user"), Some(FieldValue::Integer(10)));
        assert_eq!(favorite.field_value("restaurant"), Some(FieldValue::Integer(7)));
        assert!(!favorite.is_deleted());

        let blocked = UserBlocklistRestaurant::new(2, 10, 8);
        assert_eq!(blocked.field_value("idUserBlocklist"), Some(FieldValue::Integer(2)));
        assert_eq!(UserBlocklistRestaurant::resource_name(), "user_blocklist_restaurant");
    }
}
