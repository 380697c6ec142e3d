//! Restaurant persistence over PostgreSQL
//!
//! [`RestaurantStore`] is the service's only seam to the relational store.
//! Handlers are generic over it, so tests can substitute an in-memory
//! implementation for the [`PgRestaurantStore`] used in production.

use std::future::Future;

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Restaurant, RestaurantSummary};

/// Mean earth radius in meters, for the great-circle distance filter.
/// The radius parameter of [`RestaurantStore::within_radius`] uses the
/// same unit.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Persistence operations over the restaurant table
pub trait RestaurantStore: Send + Sync {
    /// `(id, name)` of every stored record, in storage order.
    fn list(&self) -> impl Future<Output = Result<Vec<RestaurantSummary>>> + Send;

    /// Full record for `id`, or `None` if no such row exists.
    fn fetch(&self, id: &str) -> impl Future<Output = Result<Option<Restaurant>>> + Send;

    /// Persist a freshly created record.
    fn insert(&self, record: &Restaurant) -> impl Future<Output = Result<()>> + Send;

    /// Persist a full, already-merged record over the stored row.
    fn update(&self, record: &Restaurant) -> impl Future<Output = Result<()>> + Send;

    /// Remove the row for `id`. Deleting an absent id is a successful
    /// no-op, never a storage error.
    fn delete(&self, id: &str) -> impl Future<Output = Result<()>> + Send;

    /// Every record whose great-circle distance from `(lat, lng)` is
    /// strictly less than `radius_m` meters.
    fn within_radius(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
    ) -> impl Future<Output = Result<Vec<Restaurant>>> + Send;

    /// Connectivity probe for the readiness endpoint.
    fn ping(&self) -> impl Future<Output = Result<()>> + Send;
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgRestaurantStore {
    pool: PgPool,
}

impl PgRestaurantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RestaurantStore for PgRestaurantStore {
    async fn list(&self) -> Result<Vec<RestaurantSummary>> {
        let summaries = sqlx::query_as::<_, RestaurantSummary>("SELECT id, name FROM restaurants")
            .fetch_all(&self.pool)
            .await?;
        Ok(summaries)
    }

    async fn fetch(&self, id: &str) -> Result<Option<Restaurant>> {
        let record = sqlx::query_as::<_, Restaurant>(
            r#"
            SELECT id, rating, name, site, email, phone, street, city, state, lat, lng
            FROM restaurants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn insert(&self, record: &Restaurant) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO restaurants (id, rating, name, site, email, phone, street, city, state, lat, lng)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&record.id)
        .bind(record.rating)
        .bind(&record.name)
        .bind(&record.site)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(&record.street)
        .bind(&record.city)
        .bind(&record.state)
        .bind(record.lat)
        .bind(record.lng)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, record: &Restaurant) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE restaurants
            SET rating = $2, name = $3, site = $4, email = $5, phone = $6,
                street = $7, city = $8, state = $9, lat = $10, lng = $11
            WHERE id = $1
            "#,
        )
        .bind(&record.id)
        .bind(record.rating)
        .bind(&record.name)
        .bind(&record.site)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(&record.street)
        .bind(&record.city)
        .bind(&record.state)
        .bind(record.lat)
        .bind(record.lng)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM restaurants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("Delete for absent restaurant {}, nothing removed", id);
        }
        Ok(())
    }

    async fn within_radius(&self, lat: f64, lng: f64, radius_m: f64) -> Result<Vec<Restaurant>> {
        // Haversine over a spherical earth, evaluated by the store so the
        // distance filter runs next to the data.
        let matches = sqlx::query_as::<_, Restaurant>(
            r#"
            SELECT id, rating, name, site, email, phone, street, city, state, lat, lng
            FROM restaurants
            WHERE 2.0 * $4 * asin(sqrt(
                      pow(sin(radians(lat - $1) / 2.0), 2)
                      + cos(radians($1)) * cos(radians(lat))
                        * pow(sin(radians(lng - $2) / 2.0), 2)
                  )) < $3
            "#,
        )
        .bind(lat)
        .bind(lng)
        .bind(radius_m)
        .bind(EARTH_RADIUS_M)
        .fetch_all(&self.pool)
        .await?;
        Ok(matches)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
