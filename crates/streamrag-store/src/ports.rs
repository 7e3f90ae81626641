use async_trait::async_trait;
use streamrag_core::error::Result;
use streamrag_core::models::RetrievedPassage;

/// A passage paired with its embedding, ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct PassageEntry {
    /// The passage text
    pub text: String,

    /// The embedding vector, length equal to the store dimension
    pub embedding: Vec<f32>,
}

impl PassageEntry {
    pub fn new(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            embedding,
        }
    }
}

/// Port for vector storage and cosine similarity search
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Provision storage (extension, table, index). Idempotent.
    async fn ensure_schema(&self) -> Result<()>;

    /// Remove all stored passages
    async fn clear(&self) -> Result<()>;

    /// Store passages with their embeddings
    ///
    /// Every embedding must match the store dimension; a mismatch fails the
    /// whole batch, vectors are never truncated or padded.
    async fn insert(&self, entries: &[PassageEntry]) -> Result<usize>;

    /// Return the top `k` passages by descending cosine similarity to the
    /// query vector
    ///
    /// A store holding fewer than `k` passages returns all of them; an
    /// empty store returns an empty list with no error. Ties keep the
    /// store's stable order.
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedPassage>>;

    /// Number of stored passages
    async fn count(&self) -> Result<usize>;

    /// The dimensionality of stored vectors
    fn dimensions(&self) -> usize;
}
