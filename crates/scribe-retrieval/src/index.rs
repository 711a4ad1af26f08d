//! In-memory passage index with brute-force cosine similarity search.
//!
//! Search is O(n) over all passages, which is fine for the rule books and
//! handouts this index is seeded with.

use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::error::RetrievalError;

/// A single hit returned from a passage search.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: Uuid,
    /// Cosine similarity score (-1.0 to 1.0).
    pub score: f64,
    pub text: String,
}

#[derive(Debug, Clone)]
struct PassageEntry {
    id: Uuid,
    embedding: Vec<f32>,
    text: String,
}

/// In-memory passage index using brute-force cosine similarity.
///
/// Thread-safe via interior RwLock. Entries keep insertion order, which
/// breaks ties between equally similar passages.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    entries: Arc<RwLock<Vec<PassageEntry>>>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Insert a passage and its embedding. Returns the new entry's ID.
    pub fn insert(&self, embedding: Vec<f32>, text: String) -> Result<Uuid, RetrievalError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| RetrievalError::Store(format!("Lock poisoned: {}", e)))?;
        let id = Uuid::new_v4();
        entries.push(PassageEntry {
            id,
            embedding,
            text,
        });
        Ok(id)
    }

    /// Search for the k passages nearest to the query vector.
    ///
    /// Returns results sorted by descending similarity score.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, RetrievalError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| RetrievalError::Store(format!("Lock poisoned: {}", e)))?;

        let mut scored: Vec<SearchHit> = entries
            .iter()
            .map(|entry| SearchHit {
                id: entry.id,
                score: cosine_similarity(query, &entry.embedding),
                text: entry.text.clone(),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if the lengths differ or either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();

    let mag_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}
