//! Configuration for vector retrieval.

use serde::{Deserialize, Serialize};

/// Number of records fetched per query.
pub const DEFAULT_TOP_K: usize = 3;

/// Pinecone index holding the professor reviews.
pub const DEFAULT_INDEX_NAME: &str = "rag";

/// Namespace inside the index.
pub const DEFAULT_NAMESPACE: &str = "nsl";

/// Pinecone control plane used to resolve index hosts.
pub const DEFAULT_CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

/// Pinecone REST API version header value.
pub const PINECONE_API_VERSION: &str = "2024-07";

/// Configuration for the retrieval stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum number of records returned per query.
    pub top_k: usize,

    /// Pinecone index settings.
    pub pinecone: PineconeConfig,
}

impl RetrievalConfig {
    /// Set the number of records returned per query.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the Pinecone configuration.
    pub fn with_pinecone(mut self, pinecone: PineconeConfig) -> Self {
        self.pinecone = pinecone;
        self
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            pinecone: PineconeConfig::default(),
        }
    }
}

/// Connection settings for a Pinecone index.
#[derive(Clone, Serialize, Deserialize)]
pub struct PineconeConfig {
    /// API key sent in the `Api-Key` header.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Index name, used to resolve the host when `host` is unset.
    pub index_name: String,

    /// Namespace queried inside the index.
    pub namespace: String,

    /// Data-plane host, e.g. `https://rag-abc123.svc.pinecone.io`.
    pub host: Option<String>,

    /// Dimension of the stored vectors, if known up front.
    pub dimension: Option<usize>,

    /// Control-plane base URL.
    pub control_plane_url: String,
}

impl PineconeConfig {
    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the index name.
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = name.into();
        self
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the data-plane host, skipping control-plane resolution.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the expected vector dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Set the control-plane base URL.
    pub fn with_control_plane_url(mut self, url: impl Into<String>) -> Self {
        self.control_plane_url = url.into();
        self
    }
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            index_name: DEFAULT_INDEX_NAME.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            host: None,
            dimension: None,
            control_plane_url: DEFAULT_CONTROL_PLANE_URL.to_string(),
        }
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for PineconeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("index_name", &self.index_name)
            .field("namespace", &self.namespace)
            .field("host", &self.host)
            .field("dimension", &self.dimension)
            .field("control_plane_url", &self.control_plane_url)
            .finish()
    }
}
