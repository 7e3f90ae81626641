//! Startup configuration for StreamRAG
//!
//! All settings are resolved once at startup into an explicit [`AppConfig`]
//! and injected into components. Safety-relevant values (embedding
//! dimension, grounding threshold, generation options) have no fallback
//! defaults: a missing value is a [`StreamragError::ConfigMissing`] and the
//! process must not serve requests.

use crate::error::{Result, StreamragError};
use crate::models::GenerationOptions;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Validated process-wide configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection URL; `None` selects the in-memory store
    pub database_url: Option<String>,

    /// Embedding model name
    pub embed_model: String,

    /// Embedding dimension agreed between embedder and store
    pub embed_dim: usize,

    /// Passages table name in the vector store
    pub table: String,

    /// Grounding threshold: max similarity at or above this value selects
    /// grounded mode
    pub context_threshold: f32,

    /// Directory holding `prompt_grounded.txt` and `prompt_general.txt`
    pub template_dir: PathBuf,

    /// Base URL of the Ollama API
    pub ollama_url: String,

    /// Generator model name
    pub generator_model: String,

    /// Required generation options
    pub generation: GenerationOptions,
}

impl AppConfig {
    /// Load and validate configuration from environment variables
    ///
    /// Fails eagerly on any missing or malformed required value so that a
    /// misconfigured process never reaches the request path.
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").ok();

        let embed_model = require("STREAMRAG_EMBED_MODEL")?;
        let embed_dim: usize = require_parsed("STREAMRAG_EMBED_DIM", "a positive integer")?;
        if embed_dim == 0 {
            return Err(StreamragError::ConfigInvalid {
                key: "STREAMRAG_EMBED_DIM".to_string(),
                reason: "embedding dimension must be at least 1".to_string(),
            });
        }

        let table = env::var("STREAMRAG_TABLE").unwrap_or_else(|_| "passages".to_string());

        let context_threshold: f32 =
            require_parsed("STREAMRAG_CONTEXT_THRESHOLD", "a finite float")?;
        if !context_threshold.is_finite() {
            return Err(StreamragError::ConfigInvalid {
                key: "STREAMRAG_CONTEXT_THRESHOLD".to_string(),
                reason: "threshold must be finite".to_string(),
            });
        }

        let template_dir = PathBuf::from(
            env::var("STREAMRAG_TEMPLATE_DIR").unwrap_or_else(|_| "templates".to_string()),
        );

        let ollama_url = env::var("STREAMRAG_OLLAMA_URL")
            .unwrap_or_else(|_| "http://localhost:11434".to_string());

        let generator_model = require("STREAMRAG_GENERATOR_MODEL")?;

        let temperature: f32 = require_parsed("STREAMRAG_TEMPERATURE", "a finite float")?;
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(StreamragError::ConfigInvalid {
                key: "STREAMRAG_TEMPERATURE".to_string(),
                reason: "temperature must be a non-negative finite float".to_string(),
            });
        }
        let context_window: u32 = require_parsed("STREAMRAG_NUM_CTX", "a positive integer")?;
        let max_output_tokens: u32 =
            require_parsed("STREAMRAG_NUM_PREDICT", "a positive integer")?;
        if context_window == 0 || max_output_tokens == 0 {
            return Err(StreamragError::ConfigInvalid {
                key: "STREAMRAG_NUM_CTX".to_string(),
                reason: "token budgets must be at least 1".to_string(),
            });
        }

        Ok(Self {
            database_url,
            embed_model,
            embed_dim,
            table,
            context_threshold,
            template_dir,
            ollama_url,
            generator_model,
            generation: GenerationOptions {
                temperature,
                context_window,
                max_output_tokens,
            },
        })
    }

    /// Check if PostgreSQL storage is configured
    pub fn uses_postgres(&self) -> bool {
        self.database_url.is_some()
    }
}

fn require(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(StreamragError::ConfigMissing {
            key: key.to_string(),
        }),
    }
}

fn require_parsed<T: FromStr>(key: &str, expected: &str) -> Result<T> {
    let raw = require(key)?;
    raw.trim().parse().map_err(|_| StreamragError::ConfigInvalid {
        key: key.to_string(),
        reason: format!("expected {}, got '{}'", expected, raw),
    })
}
