//! Retriever backed by a Chroma HTTP server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::embedding::EmbeddingService;
use crate::error::RetrievalError;
use crate::retriever::{check_top_n, ContextRetriever};

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    id: String,
}

#[derive(Debug, Deserialize)]
struct QueryReply {
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
}

/// Queries a named Chroma collection with locally computed embeddings.
///
/// The collection id is resolved by name on first use and cached.
pub struct ChromaRetriever<E> {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    collection_id: OnceCell<String>,
    embedder: E,
}

impl<E: EmbeddingService> ChromaRetriever<E> {
    pub fn new(
        base_url: impl Into<String>,
        collection: impl Into<String>,
        embedder: E,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .use_rustls_tls()
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to create HTTP client, using default config: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            collection_id: OnceCell::new(),
            embedder,
        }
    }

    /// `base_url` joined with `segments`, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RetrievalError> {
        let invalid = || RetrievalError::Store(format!("invalid Chroma URL: {}", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn collection_id(&self) -> Result<&str, RetrievalError> {
        let id = self
            .collection_id
            .get_or_try_init(|| async {
                let url = self.endpoint(&["api", "v1", "collections", self.collection.as_str()])?;
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| RetrievalError::Store(format!("Chroma unreachable: {}", e)))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(RetrievalError::Store(format!(
                        "collection {} lookup returned HTTP status {}",
                        self.collection,
                        status.as_u16()
                    )));
                }

                let info: CollectionInfo = response.json().await.map_err(|e| {
                    RetrievalError::Store(format!("invalid collection reply: {}", e))
                })?;
                info!(collection = %self.collection, id = %info.id, "Resolved Chroma collection");
                Ok::<_, RetrievalError>(info.id)
            })
            .await?;
        Ok(id.as_str())
    }
}

#[async_trait]
impl<E: EmbeddingService> ContextRetriever for ChromaRetriever<E> {
    async fn retrieve(&self, query: &str, top_n: usize) -> Result<Vec<String>, RetrievalError> {
        check_top_n(top_n)?;

        let embedding = self.embedder.embed(query).await?;
        let id = self.collection_id().await?;
        let url = self.endpoint(&["api", "v1", "collections", id, "query"])?;

        let response = self
            .client
            .post(url)
            .json(&json!({
                "query_embeddings": [embedding],
                "n_results": top_n,
                "include": ["documents"],
            }))
            .send()
            .await
            .map_err(|e| RetrievalError::Store(format!("Chroma query failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Store(format!(
                "Chroma query returned HTTP status {}",
                status.as_u16()
            )));
        }

        let reply: QueryReply = response
            .json()
            .await
            .map_err(|e| RetrievalError::Store(format!("invalid query reply: {}", e)))?;

        let passages: Vec<String> = reply
            .documents
            .and_then(|docs| docs.into_iter().next())
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect();

        debug!(collection = %self.collection, top_n, hits = passages.len(), "Chroma query done");
        Ok(passages)
    }
}
