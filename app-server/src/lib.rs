//! HTTP server for the professor recommendation chat.
//!
//! [`run`] wires the OpenAI and Pinecone clients into a
//! [`ChatPipeline`](rmp_chat::ChatPipeline) and serves it until ctrl-c.

mod config;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use rmp_chat::ChatPipeline;
use rmp_chat::OpenAIChatGenerator;
use rmp_embeddings::OpenAIProvider;
use rmp_retrieval::PineconeIndex;
use rmp_retrieval::VectorRetriever;
use tracing::info;

pub use config::DEFAULT_BIND_ADDR;
pub use config::ServerConfig;
pub use routes::ApiError;
pub use routes::AppState;
pub use routes::router;

/// Build the pipeline against the live OpenAI and Pinecone services.
///
/// Resolves the Pinecone index host when it is not configured.
pub async fn build_pipeline(config: &ServerConfig) -> Result<ChatPipeline> {
    let client = reqwest::Client::new();

    let embedder = OpenAIProvider::new()
        .with_api_key(config.openai_api_key.clone())
        .with_base_url(config.openai_base_url.clone())
        .with_model(config.chat.embedding_model.clone())
        .with_client(client.clone());

    let index = PineconeIndex::connect(config.retrieval.pinecone.clone())
        .await
        .context("failed to connect to Pinecone")?;
    info!(
        "Querying Pinecone namespace {} at {}",
        index.namespace(),
        index.host()
    );
    let retriever = VectorRetriever::from_config(Arc::new(index), &config.retrieval);

    let generator = OpenAIChatGenerator::new()
        .with_api_key(config.openai_api_key.clone())
        .with_base_url(config.openai_base_url.clone())
        .with_model(config.chat.chat_model.clone())
        .with_client(client);

    let pipeline = ChatPipeline::new(Arc::new(embedder), retriever, Arc::new(generator))
        .with_config(&config.chat);
    Ok(pipeline)
}

/// Serve the chat API on `config.bind_addr` until shutdown.
pub async fn run(config: ServerConfig) -> Result<()> {
    let pipeline = build_pipeline(&config).await?;
    let app = router(Arc::new(pipeline));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server shutdown")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {err}");
    }
}
