/// Groq vision provider
///
/// Uses Groq's OpenAI-compatible chat completions endpoint. The image is
/// downloaded here and inlined as a base64 data URL, so the model never needs
/// to reach the original host.
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    services::providers::VisionProvider,
};

const TEMPERATURE: f32 = 1.0;
const MAX_TOKENS: u32 = 1024;
const TOP_P: f32 = 1.0;

#[derive(Clone)]
pub struct GroqVisionProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    ImageUrl { image_url: ImageUrl },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GroqVisionProvider {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    /// Downloads an image and returns it base64-encoded
    async fn encode_image(&self, image_url: &str) -> AppResult<String> {
        let fetch_error = |e: reqwest::Error| {
            AppError::InvalidInput(format!("Error fetching image: {}", e))
        };

        let bytes = self
            .http_client
            .get(image_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_error)?
            .bytes()
            .await
            .map_err(fetch_error)?;

        tracing::debug!(image_url = %image_url, size = bytes.len(), "Fetched image");

        Ok(BASE64.encode(&bytes))
    }

    fn build_request<'a>(&'a self, base64_image: &str, user_query: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/jpeg;base64,{}", base64_image),
                        },
                    },
                    ContentPart::Text { text: user_query },
                ],
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            top_p: TOP_P,
            stream: false,
        }
    }
}

/// Pulls the first choice's text out of a completion
fn first_message(response: ChatCompletionResponse) -> AppResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AppError::ExternalApi("API call error: no completion returned".to_string()))
}

#[async_trait::async_trait]
impl VisionProvider for GroqVisionProvider {
    async fn describe_image(&self, image_url: &str, user_query: &str) -> AppResult<String> {
        let base64_image = self.encode_image(image_url).await?;
        let request = self.build_request(&base64_image, user_query);

        let url = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("API call error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "API call error: Groq API returned status {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("API call error: {}", e)))?;

        let message = first_message(completion)?;

        tracing::info!(
            model = %self.model,
            message_length = message.len(),
            "Vision completion received"
        );

        Ok(message)
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_provider() -> GroqVisionProvider {
        GroqVisionProvider::new(
            "test_key".to_string(),
            "http://test.local/openai/v1".to_string(),
            "llama-3.2-90b-vision-preview".to_string(),
        )
    }

    #[test]
    fn test_build_request_shape() {
        let provider = create_test_provider();
        let request = provider.build_request("aGVsbG8=", "What is in this picture?");

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "llama-3.2-90b-vision-preview",
                "messages": [{
                    "role": "user",
                    "content": [
                        {
                            "type": "image_url",
                            "image_url": { "url": "data:image/jpeg;base64,aGVsbG8=" }
                        },
                        { "type": "text", "text": "What is in this picture?" }
                    ]
                }],
                "temperature": 1.0,
                "max_tokens": 1024,
                "top_p": 1.0,
                "stream": false
            })
        );
    }

    #[test]
    fn test_first_message_success() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "A red bicycle." } },
                { "index": 1, "message": { "role": "assistant", "content": "Ignored." } }
            ]
        }))
        .unwrap();

        assert_eq!(first_message(response).unwrap(), "A red bicycle.");
    }

    #[test]
    fn test_first_message_empty_choices() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();

        let result = first_message(response);
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(create_test_provider().name(), "groq");
    }
}
