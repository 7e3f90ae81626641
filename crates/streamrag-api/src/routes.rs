use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use streamrag_core::models::{AnswerResponse, RetrievedPassage};
use streamrag_store::ports::PassageEntry;

use crate::error::ApiError;
use crate::state::AppState;

/// Demo corpus seeded when `/api/v1/embed` is called without a body
const DEMO_CORPUS: &[&str] = &[
    "The sky is blue on a clear day.",
    "Rain falls from clouds during a storm.",
    "Cats are small animals that like to sleep.",
    "Dogs are friendly pets that enjoy walks.",
    "Fish live in water and breathe through gills.",
    "Apples are sweet fruits that can be red or green.",
    "Bananas are yellow when they are ripe.",
    "Bread is made from flour, water, and yeast.",
    "Soccer is played with a round ball on a field.",
    "Basketball is played with a hoop and an orange ball.",
    "Cars use engines to move along roads.",
    "Trains run on tracks and can carry many people.",
];

#[derive(Debug, Default, Deserialize)]
pub struct EmbedRequest {
    pub corpus: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    pub ok: bool,
    pub inserted: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    5
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub ok: bool,
    pub query: String,
    pub k: usize,
    pub results: Vec<RetrievedPassage>,
}

#[derive(Debug, Serialize)]
pub struct InitResponse {
    pub ok: bool,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/init", post(handle_init))
        .route("/api/v1/embed", post(handle_embed))
        .route("/api/v1/search", post(handle_search))
        .route("/api/v1/answer", post(handle_answer))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "streamrag-api"
    }))
}

/// POST /api/v1/init - Provision the store schema (idempotent)
async fn handle_init(State(state): State<Arc<AppState>>) -> Result<Json<InitResponse>, ApiError> {
    state.store.ensure_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Schema provisioning failed");
        ApiError::from(e)
    })?;

    tracing::info!(table = %state.config.table, "Schema provisioned");
    Ok(Json(InitResponse { ok: true }))
}

/// POST /api/v1/embed - Embed a corpus and replace the stored passages
///
/// Uses the built-in demo corpus when none is supplied. The embedding
/// batch is validated against the configured dimension before the store is
/// touched, so a mismatch never leaves it half-replaced.
async fn handle_embed(
    State(state): State<Arc<AppState>>,
    request: Option<Json<EmbedRequest>>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let corpus: Vec<String> = match request.and_then(|Json(r)| r.corpus) {
        Some(corpus) => corpus,
        None => DEMO_CORPUS.iter().map(|s| s.to_string()).collect(),
    };

    tracing::info!(passages = corpus.len(), "Embedding corpus");

    let vectors = state.embedder.embed_batch(&corpus).await?;
    for vector in &vectors {
        if vector.len() != state.config.embed_dim {
            return Err(ApiError::internal("Embedding dimension mismatch").with_details(format!(
                "got {}, expected {}",
                vector.len(),
                state.config.embed_dim
            )));
        }
    }

    let entries: Vec<PassageEntry> = corpus
        .into_iter()
        .zip(vectors)
        .map(|(text, embedding)| PassageEntry { text, embedding })
        .collect();

    state.store.clear().await?;
    let inserted = state.store.insert(&entries).await?;

    tracing::info!(inserted = inserted, "Corpus replaced");
    Ok(Json(EmbedResponse { ok: true, inserted }))
}

/// POST /api/v1/search - Ranked similarity search without generation
async fn handle_search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    tracing::info!(query = %request.query, k = request.k, "Processing search request");

    let result = state.retriever().retrieve(&request.query, request.k).await?;

    Ok(Json(SearchResponse {
        ok: true,
        query: result.query,
        k: result.k,
        results: result.passages,
    }))
}

/// POST /api/v1/answer - Full retrieval-grounding-generation pipeline
///
/// Validation failures surface as HTTP 200 with `{ok: false, error}`;
/// collaborator failures abort the request with an error status.
async fn handle_answer(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    tracing::info!(query = %request.query, k = request.k, "Processing answer request");

    let response = state.pipeline().answer(&request.query, request.k).await.map_err(|e| {
        tracing::error!(error = %e, "Answer pipeline failed");
        ApiError::from(e)
    })?;

    Ok(Json(response))
}
