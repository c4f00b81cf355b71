use reqwest::Client as HttpClient;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    services::providers::TranscriptionProvider,
};

/// Transcription service reached over plain HTTP
///
/// Posts `{"url": ...}` to the configured endpoint, which is expected to
/// already carry model and language selection in its query string.
#[derive(Clone)]
pub struct HttpTranscriptionProvider {
    http_client: HttpClient,
    api_url: String,
}

impl HttpTranscriptionProvider {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }
}

/// Extracts transcript text from `transcription.text`, or a top-level `text`
fn transcript_text(body: &Value) -> Option<String> {
    body.get("transcription")
        .and_then(|t| t.get("text"))
        .or_else(|| body.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait::async_trait]
impl TranscriptionProvider for HttpTranscriptionProvider {
    async fn transcribe(&self, media_url: &str) -> AppResult<String> {
        let response = self
            .http_client
            .post(&self.api_url)
            .json(&json!({ "url": media_url }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(status = %status, media_url = %media_url, "Transcription request failed");
            return Err(AppError::ExternalApi(format!(
                "Request failed with status code {}",
                status.as_u16()
            )));
        }

        let body: Value = response.json().await?;

        transcript_text(&body).ok_or_else(|| {
            AppError::ExternalApi("Transcription response did not contain any text".to_string())
        })
    }

    fn name(&self) -> &'static str {
        "http-transcription"
    }
}
