//! Restaurant CRUD and statistics handlers
//!
//! Each handler validates first and touches storage only on success, so a
//! rejected payload never leaves a partial write behind.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{RatingStats, Restaurant, RestaurantSummary};
use crate::repository::RestaurantStore;
use crate::state::AppState;
use crate::validation;

/// Response envelope for the list endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct RestaurantList {
    pub restaurants: Vec<RestaurantSummary>,
}

/// Plain confirmation message
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Confirmation plus the minted id
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: String,
}

/// Raw query parameters of the statistics endpoint, validated by hand so
/// absent and non-numeric values report the offending parameter by name.
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    latitude: Option<String>,
    longitude: Option<String>,
    radius: Option<String>,
}

/// List all restaurants as `(id, name)` pairs
#[instrument(skip(state))]
pub async fn list_restaurants<S>(State(state): State<AppState<S>>) -> Result<Json<RestaurantList>>
where
    S: RestaurantStore + Clone + Send + Sync + 'static,
{
    let restaurants = state.store().list().await?;

    tracing::info!("Listed {} restaurants", restaurants.len());
    Ok(Json(RestaurantList { restaurants }))
}

/// Get the full record for one restaurant
#[instrument(skip(state))]
pub async fn get_restaurant<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Restaurant>>
where
    S: RestaurantStore + Clone + Send + Sync + 'static,
{
    let restaurant = state.store().fetch(&id).await?.ok_or(Error::NotFound)?;
    Ok(Json(restaurant))
}

/// Create a restaurant from a full payload
///
/// The id is minted here; a client-supplied id is ignored.
#[instrument(skip(state, payload))]
pub async fn create_restaurant<S>(
    State(state): State<AppState<S>>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<CreatedResponse>)>
where
    S: RestaurantStore + Clone + Send + Sync + 'static,
{
    let fields = validation::validate_create(&payload)?;
    let record = fields.into_restaurant(Uuid::new_v4().to_string());

    state.store().insert(&record).await?;

    tracing::info!("Created restaurant: {} ({})", record.name, record.id);
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Restaurant created".to_string(),
            id: record.id,
        }),
    ))
}

/// Partially update a restaurant
///
/// Only the fields present in the payload are overwritten; the merge
/// happens over the stored record, then the merged row is persisted.
#[instrument(skip(state, payload))]
pub async fn update_restaurant<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<MessageResponse>>
where
    S: RestaurantStore + Clone + Send + Sync + 'static,
{
    let patch = validation::validate_update(&payload)?;

    let mut record = state.store().fetch(&id).await?.ok_or(Error::NotFound)?;
    record.apply(patch);
    state.store().update(&record).await?;

    tracing::info!("Updated restaurant: {}", record.id);
    Ok(Json(MessageResponse {
        message: "Restaurant updated".to_string(),
    }))
}

/// Delete a restaurant
///
/// Deleting an id that does not exist still reports success; the store
/// guards the absent-row case instead of erroring.
#[instrument(skip(state))]
pub async fn delete_restaurant<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>>
where
    S: RestaurantStore + Clone + Send + Sync + 'static,
{
    state.store().delete(&id).await?;

    tracing::info!("Deleted restaurant: {}", id);
    Ok(Json(MessageResponse {
        message: "Restaurant deleted".to_string(),
    }))
}

/// Rating statistics over every restaurant within a radius
///
/// The radius is interpreted in meters and the filter is strict: records at
/// exactly the radius are excluded.
#[instrument(skip(state))]
pub async fn restaurant_statistics<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<RatingStats>>
where
    S: RestaurantStore + Clone + Send + Sync + 'static,
{
    let (lat, lng, radius) = validation::validate_radius_query(
        query.latitude.as_deref(),
        query.longitude.as_deref(),
        query.radius.as_deref(),
    )?;

    let matches = state.store().within_radius(lat, lng, radius).await?;
    let ratings: Vec<i32> = matches.iter().map(|r| r.rating).collect();
    let stats = RatingStats::from_ratings(&ratings);

    tracing::info!(
        "Statistics over {} restaurants within {} m of ({}, {})",
        stats.count,
        radius,
        lat,
        lng
    );
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::Router;
    use http::{header, Request};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::handlers;
    use crate::repository::EARTH_RADIUS_M;

    /// In-memory store; rows keep insertion order so list order is stable.
    #[derive(Clone, Default)]
    struct MemoryStore {
        rows: Arc<Mutex<Vec<Restaurant>>>,
    }

    fn haversine_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
        let d_lat = (lat2 - lat1).to_radians();
        let d_lng = (lng2 - lng1).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }

    impl RestaurantStore for MemoryStore {
        fn list(&self) -> impl Future<Output = Result<Vec<RestaurantSummary>>> + Send {
            let summaries = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .map(|r| RestaurantSummary {
                    id: r.id.clone(),
                    name: r.name.clone(),
                })
                .collect();
            async move { Ok(summaries) }
        }

        fn fetch(&self, id: &str) -> impl Future<Output = Result<Option<Restaurant>>> + Send {
            let found = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned();
            async move { Ok(found) }
        }

        fn insert(&self, record: &Restaurant) -> impl Future<Output = Result<()>> + Send {
            self.rows.lock().unwrap().push(record.clone());
            async move { Ok(()) }
        }

        fn update(&self, record: &Restaurant) -> impl Future<Output = Result<()>> + Send {
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows.iter_mut().find(|r| r.id == record.id) {
                *row = record.clone();
            }
            drop(rows);
            async move { Ok(()) }
        }

        fn delete(&self, id: &str) -> impl Future<Output = Result<()>> + Send {
            self.rows.lock().unwrap().retain(|r| r.id != id);
            async move { Ok(()) }
        }

        fn within_radius(
            &self,
            lat: f64,
            lng: f64,
            radius_m: f64,
        ) -> impl Future<Output = Result<Vec<Restaurant>>> + Send {
            let matches = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| haversine_m(lat, lng, r.lat, r.lng) < radius_m)
                .cloned()
                .collect();
            async move { Ok(matches) }
        }

        fn ping(&self) -> impl Future<Output = Result<()>> + Send {
            async move { Ok(()) }
        }
    }

    fn test_app() -> (Router, MemoryStore) {
        let store = MemoryStore::default();
        let state = AppState::new(Config::default(), store.clone());
        (handlers::router(state), store)
    }

    fn full_payload() -> Value {
        json!({
            "name": "A",
            "rating": 3,
            "site": "s",
            "email": "e",
            "phone": "p",
            "street": "st",
            "city": "c",
            "state": "CA",
            "lat": 10.0,
            "lng": 20.0
        })
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn create(app: &Router, payload: &Value) -> String {
        let (status, body) = send(app, json_request("POST", "/restaurants", payload)).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let (app, _) = test_app();
        let id = create(&app, &full_payload()).await;

        let (status, body) = send(&app, get(&format!("/restaurants/{id}"))).await;
        assert_eq!(status, StatusCode::OK);

        let mut expected = full_payload();
        expected["id"] = json!(id);
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_create_returns_message_and_fresh_id() {
        let (app, _) = test_app();
        let (status, body) = send(&app, json_request("POST", "/restaurants", &full_payload())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Restaurant created");
        assert!(!body["id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_ids_are_unique() {
        let (app, _) = test_app();
        let first = create(&app, &full_payload()).await;
        let second = create(&app, &full_payload()).await;
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_create_overwrites_client_supplied_id() {
        let (app, _) = test_app();
        let mut payload = full_payload();
        payload["id"] = json!("client-chosen");

        let id = create(&app, &payload).await;
        assert_ne!(id, "client-chosen");
    }

    #[tokio::test]
    async fn test_create_rejects_before_persisting() {
        let (app, store) = test_app();
        let mut payload = full_payload();
        payload.as_object_mut().unwrap().remove("phone");

        let (status, body) = send(&app, json_request("POST", "/restaurants", &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing field: phone"}));
        assert!(store.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_rating() {
        let (app, _) = test_app();
        let mut payload = full_payload();
        payload["rating"] = json!(7);

        let (status, body) = send(&app, json_request("POST", "/restaurants", &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid value for field: rating"}));
    }

    #[tokio::test]
    async fn test_list_returns_id_name_pairs() {
        let (app, _) = test_app();
        let mut payload = full_payload();
        payload["name"] = json!("First");
        let first = create(&app, &payload).await;
        payload["name"] = json!("Second");
        let second = create(&app, &payload).await;

        let (status, body) = send(&app, get("/restaurants")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"restaurants": [
                {"id": first, "name": "First"},
                {"id": second, "name": "Second"},
            ]})
        );
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_404() {
        let (app, _) = test_app();
        let (status, body) = send(&app, get("/restaurants/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Restaurant not found"}));
    }

    #[tokio::test]
    async fn test_update_overwrites_only_supplied_fields() {
        let (app, _) = test_app();
        let id = create(&app, &full_payload()).await;

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/restaurants/{id}"),
                &json!({"city": "Monterrey", "rating": 4}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Restaurant updated"}));

        let (_, record) = send(&app, get(&format!("/restaurants/{id}"))).await;
        assert_eq!(record["city"], "Monterrey");
        assert_eq!(record["rating"], 4);
        assert_eq!(record["name"], "A");
        assert_eq!(record["lat"], 10.0);
    }

    #[tokio::test]
    async fn test_update_with_empty_payload_changes_nothing() {
        let (app, _) = test_app();
        let id = create(&app, &full_payload()).await;

        let (before_status, before) = send(&app, get(&format!("/restaurants/{id}"))).await;
        assert_eq!(before_status, StatusCode::OK);

        let (status, _) = send(
            &app,
            json_request("PUT", &format!("/restaurants/{id}"), &json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, after) = send(&app, get(&format!("/restaurants/{id}"))).await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_update_rejects_id_even_with_valid_fields() {
        let (app, _) = test_app();
        let id = create(&app, &full_payload()).await;

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/restaurants/{id}"),
                &json!({"id": "x", "name": "still valid"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Field 'id' is immutable"}));

        let (_, record) = send(&app, get(&format!("/restaurants/{id}"))).await;
        assert_eq!(record["name"], "A");
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_value_without_writing() {
        let (app, _) = test_app();
        let id = create(&app, &full_payload()).await;

        let (status, _) = send(
            &app,
            json_request(
                "PUT",
                &format!("/restaurants/{id}"),
                &json!({"name": "changed", "lat": 91.0}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // The valid part of the payload was not applied either
        let (_, record) = send(&app, get(&format!("/restaurants/{id}"))).await;
        assert_eq!(record["name"], "A");
        assert_eq!(record["lat"], 10.0);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_404() {
        let (app, _) = test_app();
        let (status, body) = send(
            &app,
            json_request("PUT", "/restaurants/nope", &json!({"name": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Restaurant not found"}));
    }

    #[tokio::test]
    async fn test_delete_removes_the_record() {
        let (app, _) = test_app();
        let id = create(&app, &full_payload()).await;

        let (status, body) = send(
            &app,
            Request::builder()
                .method("DELETE")
                .uri(format!("/restaurants/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Restaurant deleted"}));

        let (status, _) = send(&app, get(&format!("/restaurants/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_still_succeeds() {
        let (app, store) = test_app();
        create(&app, &full_payload()).await;

        let (status, body) = send(
            &app,
            Request::builder()
                .method("DELETE")
                .uri("/restaurants/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Restaurant deleted"}));
        assert_eq!(store.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_statistics_zero_matches_is_degenerate() {
        let (app, _) = test_app();
        let (status, body) = send(
            &app,
            get("/restaurants/statistics?latitude=0&longitude=0&radius=1"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"count": 0, "avg_rating": 0.0, "std_dev": 0.0}));
    }

    #[tokio::test]
    async fn test_statistics_aggregates_ratings_within_radius() {
        let (app, _) = test_app();
        for rating in [1, 2, 3] {
            let mut payload = full_payload();
            payload["rating"] = json!(rating);
            create(&app, &payload).await;
        }
        // Far away from the query point, must not count
        let mut far = full_payload();
        far["rating"] = json!(0);
        far["lat"] = json!(50.0);
        far["lng"] = json!(50.0);
        create(&app, &far).await;

        let (status, body) = send(
            &app,
            get("/restaurants/statistics?latitude=10.0&longitude=20.0&radius=1000"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        assert_eq!(body["avg_rating"], 2.0);
        let expected_std = (2.0_f64 / 3.0).sqrt();
        assert!((body["std_dev"].as_f64().unwrap() - expected_std).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_statistics_missing_parameter_is_400() {
        let (app, _) = test_app();
        let (status, body) = send(&app, get("/restaurants/statistics?latitude=1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing parameter: longitude"}));
    }

    #[tokio::test]
    async fn test_statistics_non_numeric_parameter_is_400() {
        let (app, _) = test_app();
        let (status, body) = send(
            &app,
            get("/restaurants/statistics?latitude=1&longitude=2&radius=close"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Parameter 'radius' is not a number"}));
    }

    #[tokio::test]
    async fn test_statistics_route_wins_over_id_capture() {
        let (app, _) = test_app();
        // No parameters at all: the statistics handler answers, not a
        // lookup for a restaurant with id "statistics".
        let (status, body) = send(&app, get("/restaurants/statistics")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing parameter: latitude"}));
    }

    #[tokio::test]
    async fn test_health_and_readiness() {
        let (app, _) = test_app();

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(&app, get("/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ready"], true);
    }

    #[tokio::test]
    async fn test_index_greeting() {
        let (app, _) = test_app();
        let (status, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "restaurant-service");
    }
}
