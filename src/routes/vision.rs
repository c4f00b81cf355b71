use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct VisionRequest {
    pub image_url: String,
    pub user_query: String,
}

#[derive(Debug, Serialize)]
pub struct VisionResponse {
    pub message: String,
}

/// Handler for image question answering
pub async fn describe(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<VisionRequest>, JsonRejection>,
) -> AppResult<Json<VisionResponse>> {
    let Json(request) = payload?;
    let provider = state
        .vision
        .as_ref()
        .ok_or_else(|| AppError::Configuration("GROQ API key not found.".to_string()))?;

    tracing::info!(
        request_id = %request_id,
        provider = provider.name(),
        image_url = %request.image_url,
        "Processing vision request"
    );

    let message = provider
        .describe_image(&request.image_url, &request.user_query)
        .await?;

    Ok(Json(VisionResponse { message }))
}
