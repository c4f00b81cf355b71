use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::AppResult, middleware::request_id::RequestId, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct AudioFile {
    pub file_url: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub text: String,
}

/// Handler for audio transcription proxy
pub async fn transcribe(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<AudioFile>, JsonRejection>,
) -> AppResult<Json<TranscriptResponse>> {
    let Json(audio) = payload?;
    tracing::info!(
        request_id = %request_id,
        provider = state.transcription.name(),
        file_url = %audio.file_url,
        "Processing transcription request"
    );

    let text = state.transcription.transcribe(&audio.file_url).await?;

    tracing::info!(
        request_id = %request_id,
        transcript_length = text.len(),
        "Transcription completed"
    );

    Ok(Json(TranscriptResponse { text }))
}
