//! Restaurant data model and response payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One restaurant record as persisted
///
/// The `id` is minted by the service at creation time and never changes;
/// every other field is mutable through a partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: String,
    pub rating: i32,
    pub name: String,
    pub site: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub lat: f64,
    pub lng: f64,
}

/// Identifier-and-name pair returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RestaurantSummary {
    pub id: String,
    pub name: String,
}

/// The ten validated non-id fields of a create payload
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantFields {
    pub rating: i32,
    pub name: String,
    pub site: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub lat: f64,
    pub lng: f64,
}

impl RestaurantFields {
    /// Build the full record by attaching a freshly minted id
    pub fn into_restaurant(self, id: String) -> Restaurant {
        Restaurant {
            id,
            rating: self.rating,
            name: self.name,
            site: self.site,
            email: self.email,
            phone: self.phone,
            street: self.street,
            city: self.city,
            state: self.state,
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Validated field subset supplied by an update payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantPatch {
    pub rating: Option<i32>,
    pub name: Option<String>,
    pub site: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Restaurant {
    /// Overwrite exactly the fields present in the patch; omitted fields
    /// keep their stored values.
    pub fn apply(&mut self, patch: RestaurantPatch) {
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(site) = patch.site {
            self.site = site;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(street) = patch.street {
            self.street = street;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(lat) = patch.lat {
            self.lat = lat;
        }
        if let Some(lng) = patch.lng {
            self.lng = lng;
        }
    }
}

/// Aggregates returned by the statistics endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    pub count: usize,
    pub avg_rating: f64,
    pub std_dev: f64,
}

impl RatingStats {
    /// Arithmetic mean and population standard deviation (divide by the
    /// full count, not count - 1) over the matched ratings.
    ///
    /// Zero matches is a defined degenerate case: all aggregates are zero,
    /// so the mean never divides by zero.
    pub fn from_ratings(ratings: &[i32]) -> Self {
        let count = ratings.len();
        if count == 0 {
            return Self {
                count: 0,
                avg_rating: 0.0,
                std_dev: 0.0,
            };
        }

        let n = count as f64;
        let avg_rating = ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / n;
        let variance = ratings
            .iter()
            .map(|&r| (f64::from(r) - avg_rating).powi(2))
            .sum::<f64>()
            / n;

        Self {
            count,
            avg_rating,
            std_dev: variance.sqrt(),
        }
    }
}
