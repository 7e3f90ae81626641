//! StreamRAG Retrieval - The retrieval-and-grounding decision pipeline
//!
//! This crate implements the core of the system: turning a user query into
//! a ranked set of similar stored passages, deciding whether the answer
//! must be grounded in that context, composing the mode-specific prompt,
//! and orchestrating the answer generation.

pub mod grounding;
pub mod pipeline;
pub mod prompt;
pub mod retriever;

pub use grounding::decide;
pub use pipeline::AnswerPipeline;
pub use prompt::{compose, FileTemplateSource, StaticTemplateSource, TemplateSource};
pub use retriever::{Retriever, MAX_TOP_K, MIN_TOP_K};
