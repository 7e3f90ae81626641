//! Query retrieval over the embedder and vector store ports

use std::sync::Arc;
use streamrag_core::error::{Result, StreamragError};
use streamrag_core::models::RetrievalResult;
use streamrag_llm::ports::Embedder;
use streamrag_store::ports::VectorStore;

/// Smallest accepted top-k
pub const MIN_TOP_K: usize = 1;

/// Largest accepted top-k
pub const MAX_TOP_K: usize = 100;

/// Retriever composing the embedding provider and the similarity store
///
/// Read-only against the store: a failed retrieval never returns partial
/// passages.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    dimensions: usize,
}

impl Retriever {
    /// Create a new retriever
    ///
    /// `dimensions` is the configured embedding dimension the store schema
    /// was provisioned with.
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>, dimensions: usize) -> Self {
        Self {
            embedder,
            store,
            dimensions,
        }
    }

    /// Validate `query` and `k` without touching any collaborator
    pub fn validate(query: &str, k: usize) -> Result<&str> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(StreamragError::Validation {
                reason: "No query provided. Please include a 'query' in the request.".to_string(),
            });
        }
        if !(MIN_TOP_K..=MAX_TOP_K).contains(&k) {
            return Err(StreamragError::Validation {
                reason: format!("k must be between {} and {}, got {}", MIN_TOP_K, MAX_TOP_K, k),
            });
        }
        Ok(trimmed)
    }

    /// Retrieve the top `k` passages most similar to `query`
    ///
    /// The query embedding must match the configured dimension; a mismatch
    /// is fatal and vectors are never truncated or padded. An empty store
    /// yields an empty passage list with no error.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<RetrievalResult> {
        let trimmed = Self::validate(query, k)?;

        let embedding = self.embedder.embed(trimmed).await?;
        if embedding.len() != self.dimensions {
            return Err(StreamragError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }

        let passages = self.store.search(&embedding, k).await?;

        tracing::debug!(
            query = %trimmed,
            k = k,
            retrieved = passages.len(),
            "Retrieved passages"
        );

        Ok(RetrievalResult {
            query: trimmed.to_string(),
            k,
            passages,
        })
    }
}
