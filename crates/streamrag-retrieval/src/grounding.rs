//! Grounding policy
//!
//! Decides whether the generator answers strictly from retrieved context
//! (`grounded`) or may fall back to open-domain knowledge (`general`).

use streamrag_core::models::{GroundingDecision, Mode, RetrievalResult};

/// Decide the answering mode from retrieval strength
///
/// `max_similarity` is the highest passage similarity, 0.0 for an empty
/// result (maximal dissimilarity, never an error). Equality with the
/// threshold resolves to grounded. Pure and total; the threshold is
/// required configuration validated at startup.
pub fn decide(result: &RetrievalResult, threshold: f32) -> GroundingDecision {
    let max_similarity =
        result.passages.iter().map(|p| p.similarity).reduce(f32::max).unwrap_or(0.0);

    let mode = if max_similarity >= threshold {
        Mode::Grounded
    } else {
        Mode::General
    };

    GroundingDecision {
        mode,
        max_similarity,
    }
}
