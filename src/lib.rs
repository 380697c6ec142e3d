//! # restaurant-service
//!
//! REST service exposing CRUD and radius-statistics operations over a
//! restaurant directory backed by PostgreSQL.
//!
//! ## Endpoints
//!
//! - `GET /restaurants` — `(id, name)` of every restaurant
//! - `GET /restaurants/{id}` — full record
//! - `POST /restaurants` — create from a full payload, id minted here
//! - `PUT /restaurants/{id}` — partial update, `id` itself is immutable
//! - `DELETE /restaurants/{id}` — remove (no-op success when absent)
//! - `GET /restaurants/statistics` — rating count/mean/population standard
//!   deviation over every record within `radius` meters of a point
//! - `/`, `/health`, `/ready` — greeting, liveness and readiness probes
//!
//! ## Example
//!
//! ```rust,no_run
//! use restaurant_service::{
//!     config::Config, database, handlers, observability::init_tracing,
//!     repository::PgRestaurantStore, server::Server, state::AppState,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let pool = database::create_pool(&config.database).await?;
//!     let state = AppState::new(config.clone(), PgRestaurantStore::new(pool));
//!
//!     Server::new(config).serve(handlers::router(state)).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod models;
pub mod observability;
pub mod repository;
pub mod server;
pub mod state;
pub mod validation;
