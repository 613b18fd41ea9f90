//! Server settings read from the process environment.

use std::fmt;
use std::net::SocketAddr;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use rmp_chat::ChatConfig;
use rmp_retrieval::PineconeConfig;
use rmp_retrieval::RetrievalConfig;

/// Address the server binds when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// OpenAI API base URL used when `OPENAI_BASE_URL` is unset.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Everything the binary needs to wire the chat pipeline.
#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub retrieval: RetrievalConfig,
    pub chat: ChatConfig,
}

impl ServerConfig {
    /// Load a `.env` file if present, then read the environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset. Both API keys are required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let Some(openai_api_key) = var("OPENAI_API_KEY") else {
            bail!("OPENAI_API_KEY must be set");
        };
        let Some(pinecone_api_key) = var("PINECONE_API_KEY") else {
            bail!("PINECONE_API_KEY must be set");
        };

        let bind = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind
            .parse()
            .with_context(|| format!("invalid BIND_ADDR {bind}"))?;

        let mut pinecone = PineconeConfig::default().with_api_key(pinecone_api_key);
        if let Some(index) = var("PINECONE_INDEX") {
            pinecone = pinecone.with_index_name(index);
        }
        if let Some(namespace) = var("PINECONE_NAMESPACE") {
            pinecone = pinecone.with_namespace(namespace);
        }
        if let Some(host) = var("PINECONE_INDEX_HOST") {
            pinecone = pinecone.with_host(host);
        }

        let mut retrieval = RetrievalConfig::default().with_pinecone(pinecone);
        if let Some(top_k) = var("RAG_TOP_K") {
            let top_k: usize = top_k
                .parse()
                .with_context(|| format!("invalid RAG_TOP_K {top_k}"))?;
            if top_k == 0 {
                bail!("RAG_TOP_K must be at least 1");
            }
            retrieval = retrieval.with_top_k(top_k);
        }

        let mut chat = ChatConfig::default();
        if let Some(model) = var("CHAT_MODEL") {
            chat = chat.with_chat_model(model);
        }
        if let Some(model) = var("EMBEDDING_MODEL") {
            chat = chat.with_embedding_model(model);
        }

        Ok(Self {
            bind_addr,
            openai_api_key,
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            retrieval,
            chat,
        })
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("retrieval", &self.retrieval)
            .field("chat", &self.chat)
            .finish()
    }
}
