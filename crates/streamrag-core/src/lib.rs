//! StreamRAG Core - Shared data model, errors, and configuration
//!
//! This crate holds the types every other StreamRAG crate depends on: the
//! error taxonomy, the validated startup configuration, and the data model
//! flowing through the answer pipeline.

pub mod config;
pub mod error;
pub mod models;

pub use config::AppConfig;
pub use error::{Result, StreamragError};
pub use models::{
    AnswerResponse, GenerationOptions, GroundingDecision, Mode, RetrievalResult, RetrievedPassage,
    Source,
};
