//! HTTP-level tests for the router over stub collaborators

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use streamrag_api::routes::create_router;
use streamrag_api::state::AppState;
use streamrag_core::config::AppConfig;
use streamrag_core::error::Result;
use streamrag_core::models::{GenerationOptions, Mode};
use streamrag_llm::ports::{Embedder, Generator};
use streamrag_retrieval::StaticTemplateSource;
use streamrag_store::memory::MemoryVectorStore;
use streamrag_store::ports::{PassageEntry, VectorStore};
use tower::ServiceExt;

const DIM: usize = 2;

struct StubEmbedder;

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![1.0, 0.0])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }

    fn dimensions(&self) -> usize {
        DIM
    }

    fn model_name(&self) -> &str {
        "stub-embedder"
    }
}

struct StubGenerator;

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
        Ok("Cats sleep a lot. [1]".to_string())
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        database_url: None,
        embed_model: "stub-embedder".to_string(),
        embed_dim: DIM,
        table: "passages".to_string(),
        context_threshold: 0.5,
        template_dir: PathBuf::from("templates"),
        ollama_url: "http://localhost:11434".to_string(),
        generator_model: "stub-generator".to_string(),
        generation: GenerationOptions {
            temperature: 0.2,
            context_window: 2048,
            max_output_tokens: 128,
        },
    }
}

async fn test_state() -> Arc<AppState> {
    let store = MemoryVectorStore::new(DIM);
    store
        .insert(&[
            PassageEntry::new("Cats are small animals that like to sleep.", vec![1.0, 0.0]),
            PassageEntry::new("Trains run on tracks and can carry many people.", vec![0.0, 1.0]),
        ])
        .await
        .unwrap();

    let templates = StaticTemplateSource::new()
        .with_template(Mode::Grounded, "grounded\n{{CONTEXT}}\nQ: {{QUESTION}}")
        .with_template(Mode::General, "general\n{{CONTEXT}}\nQ: {{QUESTION}}");

    Arc::new(AppState::new(
        Arc::new(StubEmbedder),
        Arc::new(store),
        Arc::new(templates),
        Arc::new(StubGenerator),
        test_config(),
    ))
}

async fn post_json(path: &str, body: Value) -> (StatusCode, Value) {
    let app = create_router(test_state().await);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = create_router(test_state().await);
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let (status, body) = post_json("/api/v1/search", json!({"query": "about cats", "k": 2})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["k"], 2);
    assert_eq!(
        body["results"][0]["text"],
        "Cats are small animals that like to sleep."
    );
    let top = body["results"][0]["similarity"].as_f64().unwrap();
    let second = body["results"][1]["similarity"].as_f64().unwrap();
    assert!(top > second);
}

#[tokio::test]
async fn answer_returns_grounded_response_with_sources() {
    let (status, body) = post_json("/api/v1/answer", json!({"query": "about cats", "k": 2})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["mode"], "grounded");
    assert_eq!(body["answer"], "Cats sleep a lot. [1]");
    assert_eq!(body["sources"][0]["id"], 1);
    assert_eq!(body["sources"][1]["id"], 2);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn empty_query_yields_ok_false_with_http_200() {
    let (status, body) = post_json("/api/v1/answer", json!({"query": "   "})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert!(body.get("answer").is_none());
}

#[tokio::test]
async fn out_of_range_k_on_search_is_a_bad_request() {
    let (status, body) = post_json("/api/v1/search", json!({"query": "cats", "k": 0})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("k must be between"));
}

#[tokio::test]
async fn embed_without_body_seeds_the_demo_corpus() {
    let state = test_state().await;
    let app = create_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/embed")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["inserted"], 12);
    assert_eq!(state.store.count().await.unwrap(), 12);
}

#[tokio::test]
async fn embed_replaces_the_stored_corpus() {
    let state = test_state().await;
    let app = create_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/embed")
                .header("content-type", "application/json")
                .body(Body::from(json!({"corpus": ["only one passage"]}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.store.count().await.unwrap(), 1);
}
