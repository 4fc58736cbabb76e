use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    bot::CommandHandler,
    db::PreferenceStore,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{
        preferences::PreferenceManager, providers::SimilarityProvider,
        recommendations::Recommender,
    },
};

pub mod commands;
pub mod preferences;
pub mod recommendations;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub preferences: Arc<PreferenceManager>,
    pub recommender: Arc<Recommender>,
    pub commands: Arc<CommandHandler>,
}

impl AppState {
    /// Wires the manager, recommender and command handler over one store
    pub fn new(store: Arc<dyn PreferenceStore>, provider: Arc<dyn SimilarityProvider>) -> Self {
        let preferences = Arc::new(PreferenceManager::new(store));
        let recommender = Arc::new(Recommender::new(preferences.clone(), provider));
        let commands = Arc::new(CommandHandler::new(
            preferences.clone(),
            recommender.clone(),
        ));

        Self {
            preferences,
            recommender,
            commands,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/:user_id/preferences",
            get(preferences::list)
                .post(preferences::add)
                .delete(preferences::remove),
        )
        .route(
            "/users/:user_id/preferences/clear",
            post(preferences::request_clear),
        )
        .route(
            "/users/:user_id/preferences/clear/confirm",
            post(preferences::confirm_clear),
        )
        .route(
            "/users/:user_id/recommendations",
            get(recommendations::recommend),
        )
        .route("/users/:user_id/commands", post(commands::handle))
}

/// Liveness banner for hosting platforms that probe `/`
async fn banner() -> &'static str {
    "Taste bot is running"
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
