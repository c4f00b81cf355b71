use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the product catalog CSV
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Number of recommendations returned when a request does not ask for a count
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Groq API key; the vision endpoint is unavailable without it
    #[serde(default)]
    pub groq_api_key: Option<String>,

    /// Groq OpenAI-compatible API base URL
    #[serde(default = "default_groq_api_url")]
    pub groq_api_url: String,

    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Full URL of the audio transcription endpoint
    #[serde(default = "default_transcription_api_url")]
    pub transcription_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "WMT.csv".to_string()
}

fn default_top_n() -> usize {
    5
}

fn default_groq_api_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_vision_model() -> String {
    "llama-3.2-90b-vision-preview".to_string()
}

fn default_transcription_api_url() -> String {
    "https://chatbot-rsv7.onrender.com/audio-to-text/?model=whisper-large-v3&lang=en".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
