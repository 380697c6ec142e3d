//! HTTP route handlers

mod restaurants;

pub use restaurants::{
    create_restaurant, delete_restaurant, get_restaurant, list_restaurants,
    restaurant_statistics, update_restaurant,
};

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::health::{health, readiness};
use crate::repository::RestaurantStore;
use crate::state::AppState;

/// Greeting returned at the root path
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub service: String,
    pub version: String,
}

async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the full application router
///
/// `/restaurants/statistics` is a static segment, so axum routes it ahead
/// of the `/restaurants/{id}` capture.
pub fn router<S>(state: AppState<S>) -> Router
where
    S: RestaurantStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index))
        .route("/health", get(health::<S>))
        .route("/ready", get(readiness::<S>))
        .route(
            "/restaurants",
            get(list_restaurants::<S>).post(create_restaurant::<S>),
        )
        .route("/restaurants/statistics", get(restaurant_statistics::<S>))
        .route(
            "/restaurants/{id}",
            get(get_restaurant::<S>)
                .put(update_restaurant::<S>)
                .delete(delete_restaurant::<S>),
        )
        .with_state(state)
}
