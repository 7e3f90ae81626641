//! Data model for the StreamRAG answer pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// Answering mode chosen by the grounding policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Answer only from the retrieved context snippets
    Grounded,
    /// Answer from general knowledge, citing snippets when relevant
    General,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Grounded => "grounded",
            Mode::General => "general",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored passage returned by similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// The passage text as stored
    pub text: String,

    /// Cosine-derived similarity to the query, in [-1, 1]
    pub similarity: f32,
}

/// Ranked retrieval output for a single query
///
/// Passages are ordered by descending similarity; ties keep the store's
/// stable order. Owned by the call that produced it, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// The query text as retrieved against
    pub query: String,

    /// The requested number of passages
    pub k: usize,

    /// Retrieved passages, descending similarity
    pub passages: Vec<RetrievedPassage>,
}

/// Outcome of the grounding policy for one retrieval result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundingDecision {
    /// Chosen answering mode
    pub mode: Mode,

    /// Highest similarity among retrieved passages, 0.0 when none
    pub max_similarity: f32,
}

/// A cited source in the final response, 1-indexed in retrieval order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// 1-based citation id; the prompt's context line `[i]` maps to
    /// `sources[i-1]`
    pub id: usize,

    /// The passage text
    pub text: String,

    /// Similarity of the passage to the query
    pub similarity: f32,
}

/// Terminal response returned to the caller, one per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_similarity: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnswerResponse {
    /// Build a complete successful response
    pub fn success(
        answer: impl Into<String>,
        mode: Mode,
        max_similarity: f32,
        sources: Vec<Source>,
    ) -> Self {
        Self {
            ok: true,
            answer: Some(answer.into()),
            mode: Some(mode),
            max_similarity: Some(max_similarity),
            sources: Some(sources),
            error: None,
        }
    }

    /// Build an early validation rejection (no collaborator was invoked)
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            answer: None,
            mode: None,
            max_similarity: None,
            sources: None,
            error: Some(error.into()),
        }
    }
}

/// Required generation options passed to the answer generator
///
/// All three values are required configuration; there are no implicit
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Sampling temperature
    pub temperature: f32,

    /// Context window size in tokens (`num_ctx` for Ollama)
    pub context_window: u32,

    /// Maximum tokens to generate (`num_predict` for Ollama)
    pub max_output_tokens: u32,
}
