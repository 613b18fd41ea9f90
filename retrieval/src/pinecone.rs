//! Pinecone vector index client.
//!
//! Queries go to the index's data-plane host. When no host is configured,
//! [`PineconeIndex::connect`] asks the control plane for it, which also
//! yields the index dimension used to reject mismatched query vectors.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{PINECONE_API_VERSION, PineconeConfig};
use crate::error::{Result, RetrievalError};
use crate::index::VectorIndex;
use crate::record::{Metadata, RetrievedRecord};

/// Client for one namespace of a Pinecone index.
#[derive(Debug, Clone)]
pub struct PineconeIndex {
    client: reqwest::Client,
    host: String,
    namespace: String,
    dimension: Option<usize>,
}

impl PineconeIndex {
    /// Build a client for a configured data-plane host.
    pub fn new(config: PineconeConfig) -> Result<Self> {
        let host = config
            .host
            .clone()
            .ok_or_else(|| RetrievalError::NotConfigured("missing Pinecone index host".to_string()))?;
        let client = build_client(&config)?;
        Ok(Self::from_parts(client, &host, config))
    }

    /// Build a client, resolving the host from the control plane if needed.
    pub async fn connect(config: PineconeConfig) -> Result<Self> {
        if config.host.is_some() {
            return Self::new(config);
        }

        let client = build_client(&config)?;
        let url = format!(
            "{}/indexes/{}",
            config.control_plane_url.trim_end_matches('/'),
            config.index_name
        );

        debug!("Resolving Pinecone index host for {}", config.index_name);

        let response = client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::ApiRequest {
                status: status.as_u16(),
                body,
            });
        }

        let description: IndexDescription = response
            .json()
            .await
            .map_err(|e| RetrievalError::InvalidResponse(e.to_string()))?;

        info!(
            "Resolved Pinecone index {} at {} ({} dimensions)",
            config.index_name,
            description.host,
            description
                .dimension
                .map_or_else(|| "unknown".to_string(), |d| d.to_string())
        );

        let mut config = config;
        if config.dimension.is_none() {
            config.dimension = description.dimension;
        }
        Ok(Self::from_parts(client, &description.host, config))
    }

    fn from_parts(client: reqwest::Client, host: &str, config: PineconeConfig) -> Self {
        Self {
            client,
            host: normalize_host(host),
            namespace: config.namespace,
            dimension: config.dimension,
        }
    }

    /// Data-plane base URL queries are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Namespace queried inside the index.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    fn name(&self) -> &str {
        "pinecone"
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedRecord>> {
        let body = QueryRequest {
            namespace: &self.namespace,
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
        };

        let response = self
            .client
            .post(format!("{}/query", self.host))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::ApiRequest {
                status: status.as_u16(),
                body,
            });
        }

        let result: QueryResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::InvalidResponse(e.to_string()))?;

        debug!(
            "Pinecone returned {} matches from namespace {}",
            result.matches.len(),
            self.namespace
        );

        Ok(result
            .matches
            .into_iter()
            .map(|m| RetrievedRecord {
                id: m.id,
                score: m.score,
                metadata: m.metadata.unwrap_or_default(),
            })
            .collect())
    }
}

fn build_client(config: &PineconeConfig) -> Result<reqwest::Client> {
    let api_key = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| RetrievalError::NotConfigured("missing Pinecone API key".to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        "Api-Key",
        HeaderValue::from_str(api_key)
            .map_err(|_| RetrievalError::NotConfigured("invalid Pinecone API key".to_string()))?,
    );
    headers.insert(
        "X-Pinecone-API-Version",
        HeaderValue::from_static(PINECONE_API_VERSION),
    );

    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

/// The control plane reports bare hostnames; the data plane needs a URL.
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    namespace: &'a str,
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: String,
    #[serde(default)]
    dimension: Option<usize>,
}
