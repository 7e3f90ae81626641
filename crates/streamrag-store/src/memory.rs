//! In-memory vector store for development and testing.
//!
//! This implementation uses `RwLock::unwrap()` intentionally. Lock
//! poisoning only occurs when another thread panicked while holding the
//! lock, which is an unrecoverable state. For production workloads, use the
//! PostgreSQL backend.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};
use streamrag_core::error::{Result, StreamragError};
use streamrag_core::models::RetrievedPassage;

use crate::ports::{PassageEntry, VectorStore};

/// In-memory implementation of [`VectorStore`]
#[derive(Debug, Clone)]
pub struct MemoryVectorStore {
    passages: Arc<RwLock<Vec<PassageEntry>>>,
    dimensions: usize,
}

impl MemoryVectorStore {
    /// Create a new in-memory store for vectors of the given dimension
    pub fn new(dimensions: usize) -> Self {
        Self {
            passages: Arc::new(RwLock::new(Vec::new())),
            dimensions,
        }
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn ensure_schema(&self) -> Result<()> {
        // Nothing to provision in memory
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.passages.write().unwrap().clear();
        Ok(())
    }

    async fn insert(&self, entries: &[PassageEntry]) -> Result<usize> {
        for entry in entries {
            if entry.embedding.len() != self.dimensions {
                return Err(StreamragError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: entry.embedding.len(),
                });
            }
        }

        let mut passages = self.passages.write().unwrap();
        passages.extend_from_slice(entries);
        Ok(entries.len())
    }

    /// Rank by descending cosine similarity. The sort is stable, so equal
    /// similarities keep insertion order.
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedPassage>> {
        if query.len() != self.dimensions {
            return Err(StreamragError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }

        let passages = self.passages.read().unwrap();
        let mut scored: Vec<RetrievedPassage> = passages
            .iter()
            .map(|entry| RetrievedPassage {
                text: entry.text.clone(),
                similarity: cosine_similarity(query, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal)
        });
        scored.truncate(k);

        Ok(scored)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.passages.read().unwrap().len())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
