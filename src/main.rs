use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use ragdoc::core::config::{redact_uri, ConfigService};
use ragdoc::core::logging;
use ragdoc::server;
use ragdoc::state::error::InitializationError;
use ragdoc::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = ConfigService::from_env()
        .load()
        .map_err(InitializationError::Config)?;
    logging::init(&config.server.log_dir)?;

    tracing::info!(
        "Using vector store {} ({}.{})",
        redact_uri(&config.database.uri),
        config.database.name,
        config.database.collection
    );
    tracing::info!(
        "Using Ollama at {} (chat: {}, embeddings: {})",
        config.models.base_url,
        config.models.chat_model,
        config.models.embedding_model
    );

    let bind_addr = config.server.bind.clone();
    let state = AppState::initialize(config).await?;

    match state.rag.ping_store().await {
        Ok(()) => tracing::info!("Connected to the vector store"),
        Err(err) => tracing::warn!("Vector store is not reachable yet: {}", err),
    }

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    println!("Serving on http://{}", addr);
    tracing::info!("Listening on {}", addr);

    let app: Router = server::router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
