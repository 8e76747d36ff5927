mod auth;
mod docs;
pub mod handlers;
pub mod types;

pub use auth::API_KEY_HEADER;

use crate::{
    Result, config::Config, predictor::PredictorRegistry, service::PredictionService, store,
};
use axum::{Router, middleware::from_fn_with_state, routing::get};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::docs))
        .route("/status", get(handlers::status))
        .route(
            "/api/v2/predictions",
            get(handlers::list_predictions).post(handlers::create_prediction),
        )
        .route(
            "/api/v2/predictions/:id",
            get(handlers::get_prediction).patch(handlers::patch_prediction),
        )
        .layer(from_fn_with_state(state.clone(), auth::require_api_key))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `PREDICTIONS_DB_PATH` when set and non-empty, else `server.database_path`.
pub fn database_path(config: &Config, from_env: Option<String>) -> String {
    from_env
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| config.server.database_path.clone())
}

pub async fn run(config: Config) -> Result<()> {
    // Initialize prediction storage
    let db_path = database_path(&config, std::env::var("PREDICTIONS_DB_PATH").ok());
    let store = store::open_store(&db_path).await;

    // Initialize predictors
    let predictors = PredictorRegistry::from_config(&config.predictors.models)?;
    let service = PredictionService::new(
        predictors,
        store,
        Duration::from_millis(config.predictors.timeout_ms),
    );

    // Create application state
    let app_state = AppState {
        service: Arc::new(service),
        api_key: Arc::from(config.server.api_key.as_str()),
    };

    let app = router(app_state);

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
