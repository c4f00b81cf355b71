use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    models::Catalog,
    services::providers::{TranscriptionProvider, VisionProvider},
};

pub mod products;
pub mod recommendations;
pub mod transcriptions;
pub mod vision;

/// Shared application state
///
/// The catalog is loaded once in `main` and never mutated, so handlers share
/// it without locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub default_top_n: usize,
    /// `None` when no Groq API key is configured
    pub vision: Option<Arc<dyn VisionProvider>>,
    pub transcription: Arc<dyn TranscriptionProvider>,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(Arc::new(state))
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommend-products", post(recommendations::recommend))
        .route("/products", get(products::list))
        .route("/products/by-name", get(products::by_name))
        .route("/vision", post(vision::describe))
        .route("/transcriptions", post(transcriptions::transcribe))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
