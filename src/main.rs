//! groqwise - conversational assistant backed by Groq-hosted models
//!
//! Serves independent chat sessions over HTTP. Each session keeps a bounded
//! transcript and its own generation settings.

mod api;
mod chat;
mod config;
mod llm;

use api::{create_router, AppState};
use config::AppConfig;
use llm::ModelRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_path = config::load_dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "groqwise=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    if let Some(path) = &dotenv_path {
        tracing::info!(path = %path.display(), "Loaded environment from file");
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    // Initialize LLM registry
    let llm_registry = Arc::new(ModelRegistry::new(&config.llm));
    if !llm_registry.has_models() {
        tracing::error!("No models could be initialized. Check GROQ_API_KEY and GROQ_BASE_URL.");
        std::process::exit(1);
    }
    tracing::info!(
        models = ?llm_registry.available_models(),
        default = %llm_registry.default_model_id(),
        "LLM registry initialized"
    );

    let settings = config
        .chat
        .with_default_model(llm_registry.default_model_id());
    tracing::info!(
        transcript_bound = ?settings.transcript_bound,
        trim_replies = settings.trim_replies,
        max_tokens_ceiling = settings.token_bounds.max,
        "Chat settings loaded"
    );

    let state = AppState::new(llm_registry, settings);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("groqwise listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
