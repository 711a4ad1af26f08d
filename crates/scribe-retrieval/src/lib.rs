//! Context retrieval: embeds a query and returns the nearest passages.
//!
//! Provides an in-process cosine index seeded from a passages file, a Chroma
//! HTTP client, and a no-op retriever for deployments without a store.

pub mod chroma;
pub mod embedding;
pub mod error;
pub mod index;
pub mod passages;
pub mod retriever;

pub use chroma::ChromaRetriever;
pub use embedding::{EmbeddingService, HttpEmbedding, MockEmbedding};
pub use error::RetrievalError;
pub use index::{SearchHit, VectorIndex};
pub use retriever::{join_context, ContextRetriever, IndexRetriever, NoopRetriever};
