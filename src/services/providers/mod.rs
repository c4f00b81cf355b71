/// External model providers
///
/// Each collaborator sits behind a trait so handlers only see request/response
/// contracts and tests can substitute mocks. Calls are one-shot: no retries,
/// no conversation state.
use crate::error::AppResult;

pub mod groq;
pub mod transcription;

pub use groq::GroqVisionProvider;
pub use transcription::HttpTranscriptionProvider;

/// Vision-language model that answers a question about an image
#[async_trait::async_trait]
pub trait VisionProvider: Send + Sync {
    /// Fetches the image at `image_url` and asks the model `user_query` about it
    async fn describe_image(&self, image_url: &str, user_query: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Speech-to-text service for remotely hosted media
#[async_trait::async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Returns the transcript text of the media at `media_url`
    async fn transcribe(&self, media_url: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
