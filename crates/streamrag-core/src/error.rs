//! Error types for StreamRAG

use crate::models::Mode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamragError {
    // Request validation errors (recoverable: surfaced as a structured
    // ok:false response, never a hard failure)
    #[error("Invalid request: {reason}")]
    Validation { reason: String },

    // Configuration errors (fatal at startup)
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Embedding errors
    #[error("Embedding dimension mismatch: got {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vector component at index {index} is not finite")]
    NonFiniteComponent { index: usize },

    // Retrieval errors
    #[error("Retrieval failed: {reason}")]
    Retrieval { reason: String },

    // Prompt errors
    #[error("Missing prompt template for mode '{mode}'")]
    MissingTemplate { mode: Mode },

    // Generation errors
    #[error("Generation failed: {reason}. Try: {remediation}")]
    Generation { reason: String, remediation: String },
}

pub type Result<T> = std::result::Result<T, StreamragError>;
