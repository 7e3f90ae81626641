//! StreamRAG LLM - Embedding and generation ports
//!
//! This crate defines the ports for text embedding and answer generation,
//! along with the Ollama adapter implementations.

pub mod ollama;
pub mod ports;

pub use ollama::{OllamaEmbedder, OllamaGenerator};
pub use ports::{Embedder, Generator};
