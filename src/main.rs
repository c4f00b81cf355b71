use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use product_recommender::{
    config::Config,
    models::Catalog,
    routes::{create_router, AppState},
    services::providers::{
        GroqVisionProvider, HttpTranscriptionProvider, TranscriptionProvider, VisionProvider,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "product_recommender=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // A catalog that fails to load is fatal
    let catalog = Catalog::from_path(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", config.catalog_path))?;

    let vision = match config.groq_api_key.clone() {
        Some(api_key) => Some(Arc::new(GroqVisionProvider::new(
            api_key,
            config.groq_api_url.clone(),
            config.vision_model.clone(),
        )) as Arc<dyn VisionProvider>),
        None => {
            tracing::warn!("GROQ_API_KEY not set; vision endpoint will be unavailable");
            None
        }
    };

    let transcription: Arc<dyn TranscriptionProvider> = Arc::new(HttpTranscriptionProvider::new(
        config.transcription_api_url.clone(),
    ));

    let state = AppState {
        catalog: Arc::new(catalog),
        default_top_n: config.default_top_n,
        vision,
        transcription,
    };

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
