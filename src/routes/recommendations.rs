use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::Product,
    routes::AppState,
    services::recommendations,
};

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub product_name: String,
    /// Falls back to the configured default when omitted
    #[serde(default)]
    pub top_n: Option<i64>,
}

/// Handler for product recommendation endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> AppResult<Json<Vec<Product>>> {
    let Json(request) = payload?;
    let top_n = recommendations::resolve_top_n(request.top_n, state.default_top_n);

    tracing::info!(
        request_id = %request_id,
        product_name = %request.product_name,
        top_n,
        "Processing recommendation request"
    );

    let products = recommendations::recommend_similar_products(
        &state.catalog,
        &request.product_name,
        top_n,
    )
    .map_err(|e| {
        tracing::info!(request_id = %request_id, error = %e, "Recommendation lookup failed");
        e
    })?;

    tracing::info!(
        request_id = %request_id,
        result_count = products.len(),
        "Recommendations computed"
    );

    Ok(Json(products))
}
