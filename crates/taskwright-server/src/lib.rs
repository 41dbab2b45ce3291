//! Taskwright Server
//!
//! Thin HTTP layer over the extraction pipeline: routes, CORS and JSON
//! envelopes. All extraction logic lives in `taskwright-extractor`.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::{ProviderKind, ServerConfig};
use handlers::{create_router, AppState};
use std::sync::Arc;
use std::time::Duration;
use taskwright_domain::TextCompletion;
use taskwright_extractor::ExtractionPipeline;
use taskwright_llm::{LlmError, MockProvider, OllamaProvider, OpenAiProvider};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Provider could not be constructed
    #[error("Provider error: {0}")]
    Provider(#[from] LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

impl From<taskwright_extractor::ConfigError> for ServerError {
    fn from(e: taskwright_extractor::ConfigError) -> Self {
        ServerError::Config(e.into())
    }
}

/// Install the global tracing subscriber
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed (e.g. by tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the configured provider and serve until shutdown
///
/// `env_api_key` is the startup-time fallback for `llm.api_key`.
pub async fn start_server(
    config: ServerConfig,
    env_api_key: Option<String>,
) -> Result<(), ServerError> {
    let llm = &config.llm;
    let timeout = Duration::from_secs(llm.timeout_secs);

    info!("Starting Taskwright server");
    info!("Provider: {:?}, model: {}", llm.provider, llm.model);

    let provider_kind = llm.provider;
    match provider_kind {
        ProviderKind::OpenAi => {
            let mut provider =
                OpenAiProvider::with_timeout(llm.api_key_or(env_api_key)?, &llm.model, timeout)?
                    .with_temperature(llm.temperature);
            if let Some(endpoint) = &llm.endpoint {
                provider = provider.with_endpoint(endpoint);
            }
            serve(config, provider).await
        }
        ProviderKind::Ollama => {
            let endpoint = llm
                .endpoint
                .clone()
                .unwrap_or_else(|| taskwright_llm::ollama::DEFAULT_ENDPOINT.to_string());
            let provider = OllamaProvider::with_timeout(endpoint, &llm.model, timeout)?;
            serve(config, provider).await
        }
        ProviderKind::Mock => {
            let provider = MockProvider::new(llm.mock_response.clone());
            serve(config, provider).await
        }
    }
}

/// Serve the HTTP API with an already-built provider
pub async fn serve<L>(config: ServerConfig, provider: L) -> Result<(), ServerError>
where
    L: TextCompletion + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let pipeline = ExtractionPipeline::new(provider, config.extractor.clone())?;

    info!("UTC offset: {} minutes", config.extractor.utc_offset_minutes);
    info!("Task categories: {}", pipeline.prompt().categories.len());

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
