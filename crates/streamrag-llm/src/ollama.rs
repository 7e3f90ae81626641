//! Ollama adapters for the embedding and generation ports

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use streamrag_core::error::{Result, StreamragError};
use streamrag_core::models::GenerationOptions;

use crate::ports::{Embedder, Generator};

/// System message guiding the generator's behavior in either mode. The
/// composed user prompt carries the mode, context block, and question.
const SYSTEM_MESSAGE: &str = "You are a careful assistant. In grounded mode, answer using only \
     the provided context snippets. In general mode, you may answer using your general knowledge \
     even if the context is irrelevant, while preferring and citing any relevant snippets when \
     applicable. Answer with your best guess if unknown.";

/// Ollama embedder implementation
pub struct OllamaEmbedder {
    /// Base URL for the Ollama API (e.g., "http://localhost:11434")
    base_url: String,

    /// Model name to use for embeddings
    model: String,

    /// Embedding dimensions (model-specific)
    dimensions: usize,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            dimensions,
            client: reqwest::Client::new(),
        }
    }

    /// Create with default localhost URL
    pub fn localhost(model: impl Into<String>, dimensions: usize) -> Self {
        Self::new("http://localhost:11434", model, dimensions)
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let request = OllamaEmbedRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| StreamragError::Retrieval {
                reason: format!(
                    "Failed to connect to Ollama at {}: {}. Ensure Ollama is running and the \
                     model '{}' is pulled.",
                    self.base_url, e, self.model
                ),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StreamragError::Retrieval {
                reason: format!("Ollama embeddings API error ({}): {}", status, error_text),
            });
        }

        let embed_response: OllamaEmbedResponse =
            response.json().await.map_err(|e| StreamragError::Retrieval {
                reason: format!("Failed to parse Ollama embeddings response: {}", e),
            })?;

        Ok(embed_response.embedding)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_one(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_one(text).await?);
        }
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Ollama generator implementation using the chat API
pub struct OllamaGenerator {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaGenerator {
    /// Create a new Ollama generator
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with default localhost URL
    pub fn localhost(model: impl Into<String>) -> Self {
        Self::new("http://localhost:11434", model)
    }

    /// Get the model name used for generation
    pub fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let request = OllamaChatRequest {
            model: &self.model,
            messages: vec![
                OllamaChatMessage { role: "system", content: SYSTEM_MESSAGE },
                OllamaChatMessage { role: "user", content: prompt },
            ],
            stream: false,
            options: OllamaChatOptions {
                temperature: options.temperature,
                num_ctx: options.context_window,
                num_predict: options.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| StreamragError::Generation {
                reason: format!("Failed to connect to Ollama at {}: {}", self.base_url, e),
                remediation: format!(
                    "Ensure Ollama is running and the model is pulled (e.g., 'ollama pull {}')",
                    self.model
                ),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StreamragError::Generation {
                reason: format!("Ollama chat API error ({}): {}", status, error_text),
                remediation: format!(
                    "Check that the model '{}' is available. Run 'ollama list' to see installed \
                     models.",
                    self.model
                ),
            });
        }

        // Typed contract at the generator boundary: the adapter normalizes
        // the backend reply into plain answer text.
        let chat_response: OllamaChatResponse =
            response.json().await.map_err(|e| StreamragError::Generation {
                reason: format!("Failed to parse Ollama chat response: {}", e),
                remediation: "Check Ollama API compatibility".to_string(),
            })?;

        Ok(chat_response.message.content)
    }
}

/// Request body for the Ollama embeddings API
#[derive(Debug, Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response from the Ollama embeddings API
#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

/// Request body for the Ollama chat API
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaChatMessage<'a>>,
    stream: bool,
    options: OllamaChatOptions,
}

#[derive(Debug, Serialize)]
struct OllamaChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OllamaChatOptions {
    temperature: f32,
    num_ctx: u32,
    num_predict: u32,
}

/// Response from the Ollama chat API
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedder_reports_model_and_dimensions() {
        let embedder = OllamaEmbedder::localhost("all-minilm", 384);
        assert_eq!(embedder.model_name(), "all-minilm");
        assert_eq!(embedder.dimensions(), 384);
    }

    #[test]
    fn embedder_accepts_custom_url() {
        let embedder = OllamaEmbedder::new("http://custom:11434", "test-model", 512);
        assert_eq!(embedder.base_url, "http://custom:11434");
        assert_eq!(embedder.dimensions(), 512);
    }

    #[test]
    fn generator_reports_model() {
        let generator = OllamaGenerator::localhost("gemma3");
        assert_eq!(generator.model_name(), "gemma3");
    }

    #[test]
    fn chat_options_serialize_to_ollama_names() {
        let options = OllamaChatOptions {
            temperature: 0.2,
            num_ctx: 4096,
            num_predict: 512,
        };
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["num_ctx"], 4096);
        assert_eq!(json["num_predict"], 512);
    }
}
