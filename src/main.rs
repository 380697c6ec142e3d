use restaurant_service::{
    config::Config, database, handlers, observability::init_tracing,
    repository::PgRestaurantStore, server::Server, state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let pool = database::create_pool(&config.database).await?;
    let store = PgRestaurantStore::new(pool);
    let state = AppState::new(config.clone(), store);

    tracing::info!("Routes:");
    tracing::info!("  GET    /restaurants              - List restaurants");
    tracing::info!("  POST   /restaurants              - Create restaurant");
    tracing::info!("  GET    /restaurants/{{id}}         - Get restaurant");
    tracing::info!("  PUT    /restaurants/{{id}}         - Update restaurant");
    tracing::info!("  DELETE /restaurants/{{id}}         - Delete restaurant");
    tracing::info!("  GET    /restaurants/statistics   - Rating statistics within a radius");
    tracing::info!("  GET    /health, /ready           - Probes");

    let app = handlers::router(state);
    Server::new(config).serve(app).await?;

    Ok(())
}
