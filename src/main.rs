//! coach-web - browser front-end for the coach chat
//!
//! Creates one conversation session at startup and serves the chat widget
//! over HTTP. Reloading the page re-renders the same thread.

use coach_chat::assistants::OpenAiAssistants;
use coach_chat::web::{create_router, AppState};
use coach_chat::{ChatConfig, ChatSession};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coach_chat=info,coach_web=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ChatConfig::from_env();
    let port = config.port;
    if config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; the first remote call will fail");
    }

    let client = Arc::new(OpenAiAssistants::new(config.api_key.clone()));
    let session = ChatSession::create(client, config).await?;
    tracing::info!(thread_id = %session.thread_id(), "Web session ready");

    let state = AppState::new(session);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state).layer(cors).layer(compression);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("coach-web listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
