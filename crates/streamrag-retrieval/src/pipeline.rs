//! Answer pipeline orchestration
//!
//! Single pass, strictly sequential: retrieve, decide grounding, compose
//! the prompt, generate. No retries at this layer; callers needing bounded
//! latency impose their own timeout around the whole invocation. Each call
//! owns its intermediate state, so concurrent requests never share
//! anything mutable.

use std::sync::Arc;
use streamrag_core::error::{Result, StreamragError};
use streamrag_core::models::{AnswerResponse, GenerationOptions, Source};
use streamrag_llm::ports::{Embedder, Generator};
use streamrag_store::ports::VectorStore;

use crate::grounding;
use crate::prompt::{self, TemplateSource};
use crate::retriever::Retriever;

/// Orchestrator for one question-answering request
pub struct AnswerPipeline {
    retriever: Retriever,
    templates: Arc<dyn TemplateSource>,
    generator: Arc<dyn Generator>,
    threshold: f32,
    options: GenerationOptions,
}

impl AnswerPipeline {
    /// Wire the pipeline from its collaborator ports and the validated
    /// startup configuration values it needs
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        templates: Arc<dyn TemplateSource>,
        generator: Arc<dyn Generator>,
        dimensions: usize,
        threshold: f32,
        options: GenerationOptions,
    ) -> Self {
        Self {
            retriever: Retriever::new(embedder, store, dimensions),
            templates,
            generator,
            threshold,
            options,
        }
    }

    /// Answer a query using the top `k` retrieved passages
    ///
    /// An empty query or out-of-range `k` short-circuits into an `ok:false`
    /// rejection before any collaborator is invoked. Any downstream failure
    /// aborts the request with a single error; no partial or degraded
    /// answer is ever returned.
    pub async fn answer(&self, query: &str, k: usize) -> Result<AnswerResponse> {
        // Cheap local validation: the one recoverable case.
        if let Err(StreamragError::Validation { reason }) = Retriever::validate(query, k) {
            tracing::info!(reason = %reason, "Rejected request before retrieval");
            return Ok(AnswerResponse::rejected(reason));
        }

        let result = self.retriever.retrieve(query, k).await?;
        let decision = grounding::decide(&result, self.threshold);

        tracing::info!(
            query = %result.query,
            mode = %decision.mode,
            max_similarity = decision.max_similarity,
            threshold = self.threshold,
            "Grounding decision"
        );

        let composed =
            prompt::compose(&result.query, &result.passages, decision.mode, self.templates.as_ref())?;
        let answer = self.generator.generate(&composed, &self.options).await?;

        let sources: Vec<Source> = result
            .passages
            .iter()
            .enumerate()
            .map(|(i, passage)| Source {
                id: i + 1,
                text: passage.text.clone(),
                similarity: passage.similarity,
            })
            .collect();

        Ok(AnswerResponse::success(
            answer,
            decision.mode,
            decision.max_similarity,
            sources,
        ))
    }
}
