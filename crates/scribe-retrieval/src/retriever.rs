use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::embedding::EmbeddingService;
use crate::error::RetrievalError;
use crate::index::VectorIndex;

/// Returns the passages most relevant to a query, most relevant first.
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    /// Retrieve up to `top_n` passages for `query`. An empty result is valid.
    async fn retrieve(&self, query: &str, top_n: usize) -> Result<Vec<String>, RetrievalError>;
}

/// Join passages into the single context string sent to a backend.
pub fn join_context(passages: &[String]) -> String {
    passages.join(" ")
}

pub(crate) fn check_top_n(top_n: usize) -> Result<(), RetrievalError> {
    if top_n == 0 {
        return Err(RetrievalError::InvalidTopN(top_n));
    }
    Ok(())
}

/// Retriever that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRetriever;

#[async_trait]
impl ContextRetriever for NoopRetriever {
    async fn retrieve(&self, _query: &str, top_n: usize) -> Result<Vec<String>, RetrievalError> {
        check_top_n(top_n)?;
        Ok(Vec::new())
    }
}

/// Retriever over an in-process [`VectorIndex`].
pub struct IndexRetriever<E> {
    embedder: E,
    index: VectorIndex,
}

impl<E: EmbeddingService> IndexRetriever<E> {
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            index: VectorIndex::new(),
        }
    }

    /// Embed and store one passage.
    pub async fn add_passage(&self, text: &str) -> Result<Uuid, RetrievalError> {
        let embedding = self.embedder.embed(text).await?;
        self.index.insert(embedding, text.to_string())
    }

    /// Embed and store every passage, skipping blank ones. Returns the count stored.
    pub async fn seed(&self, passages: &[String]) -> Result<usize, RetrievalError> {
        let mut stored = 0;
        for passage in passages.iter().filter(|p| !p.trim().is_empty()) {
            self.add_passage(passage).await?;
            stored += 1;
        }
        info!(count = stored, "Seeded passage index");
        Ok(stored)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[async_trait]
impl<E: EmbeddingService> ContextRetriever for IndexRetriever<E> {
    async fn retrieve(&self, query: &str, top_n: usize) -> Result<Vec<String>, RetrievalError> {
        check_top_n(top_n)?;
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let embedding = self.embedder.embed(query).await?;
        let hits = self.index.search(&embedding, top_n)?;
        debug!(
            top_n,
            hits = hits.len(),
            best_score = hits.first().map(|h| h.score),
            "Retrieved passages"
        );
        Ok(hits.into_iter().map(|hit| hit.text).collect())
    }
}
