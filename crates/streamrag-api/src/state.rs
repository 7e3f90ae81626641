use std::sync::Arc;
use streamrag_core::config::AppConfig;
use streamrag_llm::ports::{Embedder, Generator};
use streamrag_retrieval::{AnswerPipeline, Retriever, TemplateSource};
use streamrag_store::ports::VectorStore;

/// Shared application state: the collaborator ports plus the validated
/// startup configuration
#[derive(Clone)]
pub struct AppState {
    pub embedder: Arc<dyn Embedder>,
    pub store: Arc<dyn VectorStore>,
    pub templates: Arc<dyn TemplateSource>,
    pub generator: Arc<dyn Generator>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        templates: Arc<dyn TemplateSource>,
        generator: Arc<dyn Generator>,
        config: AppConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            templates,
            generator,
            config,
        }
    }

    /// Build a retriever for one request
    pub fn retriever(&self) -> Retriever {
        Retriever::new(self.embedder.clone(), self.store.clone(), self.config.embed_dim)
    }

    /// Build the answer pipeline for one request
    pub fn pipeline(&self) -> AnswerPipeline {
        AnswerPipeline::new(
            self.embedder.clone(),
            self.store.clone(),
            self.templates.clone(),
            self.generator.clone(),
            self.config.embed_dim,
            self.config.context_threshold,
            self.config.generation,
        )
    }
}
