//! Embedding service trait and implementations.
//!
//! - `HttpEmbedding` posts the text to a remote embedding model and reads the
//!   vector from its JSON reply. This is the production embedding backend.
//! - `MockEmbedding` hashes words into a fixed-size vector so texts sharing
//!   words land close together. Used in tests and local deployments.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::RetrievalError;

/// Service for generating text embeddings.
///
/// Implementations convert text into vectors compared by cosine similarity.
/// Used both when seeding the index and when answering a query.
pub trait EmbeddingService: Send + Sync {
    /// Generate an embedding vector for the given text.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, RetrievalError>> + Send;
}

// ---------------------------------------------------------------------------
// HttpEmbedding - remote embedding model
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct EmbeddingReply {
    embedding: Vec<f32>,
}

/// Embedding service backed by an HTTP endpoint.
///
/// Sends `{"text": ...}` and expects `{"embedding": [f32, ...]}`.
#[derive(Debug, Clone)]
pub struct HttpEmbedding {
    client: reqwest::Client,
    url: String,
}

impl HttpEmbedding {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
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
            url: url.into(),
        }
    }
}

impl EmbeddingService for HttpEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        if text.trim().is_empty() {
            return Err(RetrievalError::Embedding(
                "Cannot embed empty text".to_string(),
            ));
        }

        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Embedding(format!(
                "embedding service returned HTTP status {}",
                status.as_u16()
            )));
        }

        let reply: EmbeddingReply = response
            .json()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("invalid reply: {}", e)))?;

        if reply.embedding.is_empty() {
            return Err(RetrievalError::Embedding(
                "embedding service returned an empty vector".to_string(),
            ));
        }

        debug!(dimensions = reply.embedding.len(), "Embedded text");
        Ok(reply.embedding)
    }
}

// ---------------------------------------------------------------------------
// MockEmbedding - deterministic word-hash vectors
// ---------------------------------------------------------------------------

/// Default dimensionality of [`MockEmbedding`] vectors.
pub const MOCK_DIMENSIONS: usize = 384;

/// Mock embedding service producing deterministic bag-of-words vectors.
///
/// Every lowercase word is hashed into one bucket of the vector, so identical
/// texts produce identical vectors and texts sharing words score higher.
#[derive(Debug, Clone)]
pub struct MockEmbedding {
    dimensions: usize,
}

impl MockEmbedding {
    pub fn new() -> Self {
        Self::with_dimensions(MOCK_DIMENSIONS)
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn hash_to_vector(&self, text: &str) -> Vec<f32> {
        let mut result = vec![0.0f32; self.dimensions];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimensions as u64) as usize;
            result[bucket] += 1.0;
        }

        // L2-normalize so every vector is a unit vector.
        let norm: f32 = result.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in &mut result {
                *val /= norm;
            }
        }

        result
    }
}

impl Default for MockEmbedding {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingService for MockEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        if text.trim().is_empty() {
            return Err(RetrievalError::Embedding(
                "Cannot embed empty text".to_string(),
            ));
        }
        Ok(self.hash_to_vector(text))
    }
}
