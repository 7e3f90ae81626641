//! LLM port definitions

use async_trait::async_trait;
use streamrag_core::error::Result;
use streamrag_core::models::GenerationOptions;

/// Port for embedding text into fixed-dimension vector representations
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for a batch of texts
    ///
    /// Returns one vector per input text, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the dimensionality of embeddings produced by this embedder
    fn dimensions(&self) -> usize;

    /// Get the name/identifier of the embedding model
    fn model_name(&self) -> &str;
}

/// Port for answer generation
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer for a fully composed prompt
    ///
    /// The prompt is handed over opaquely; all generation options are
    /// required configuration with no implicit defaults.
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;
}
