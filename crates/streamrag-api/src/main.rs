use std::env;
use std::sync::Arc;

use streamrag_core::config::AppConfig;
use streamrag_llm::{OllamaEmbedder, OllamaGenerator};
use streamrag_retrieval::FileTemplateSource;
use streamrag_store::memory::MemoryVectorStore;
use streamrag_store::ports::VectorStore;
use streamrag_store::postgres::PostgresStore;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use streamrag_api::routes::create_router;
use streamrag_api::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streamrag_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fail fast: a process with missing required configuration must never
    // reach the request path.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            tracing::error!(
                "Remediation:\n\
                 1. Set STREAMRAG_EMBED_MODEL and STREAMRAG_EMBED_DIM for the embedder\n\
                 2. Set STREAMRAG_CONTEXT_THRESHOLD for the grounding policy\n\
                 3. Set STREAMRAG_GENERATOR_MODEL, STREAMRAG_TEMPERATURE, STREAMRAG_NUM_CTX, \
                 and STREAMRAG_NUM_PREDICT for generation"
            );
            std::process::exit(1);
        }
    };

    let templates = match FileTemplateSource::load(&config.template_dir) {
        Ok(templates) => Arc::new(templates),
        Err(e) => {
            tracing::error!(
                template_dir = %config.template_dir.display(),
                "Failed to load prompt templates: {}",
                e
            );
            tracing::error!(
                "Remediation: ensure prompt_grounded.txt and prompt_general.txt exist under the \
                 template directory (STREAMRAG_TEMPLATE_DIR)"
            );
            std::process::exit(1);
        }
    };

    let store: Arc<dyn VectorStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("DATABASE_URL found, connecting to PostgreSQL...");
            match PostgresStore::connect(database_url, &config.table, config.embed_dim).await {
                Ok(store) => {
                    tracing::info!(table = %config.table, "Connected to PostgreSQL");
                    Arc::new(store)
                }
                Err(e) => {
                    tracing::error!("Failed to connect to PostgreSQL: {}", e);
                    tracing::error!(
                        "Remediation:\n\
                         1. Ensure PostgreSQL is running with the pgvector extension available\n\
                         2. Verify DATABASE_URL is correct\n\
                         3. Check that the database exists and is accessible"
                    );
                    std::process::exit(1);
                }
            }
        }
        None => {
            tracing::info!("Using in-memory storage (set DATABASE_URL for PostgreSQL)");
            Arc::new(MemoryVectorStore::new(config.embed_dim))
        }
    };

    let embedder = Arc::new(OllamaEmbedder::new(
        &config.ollama_url,
        &config.embed_model,
        config.embed_dim,
    ));
    let generator = Arc::new(OllamaGenerator::new(&config.ollama_url, &config.generator_model));

    tracing::info!(
        embed_model = %config.embed_model,
        embed_dim = config.embed_dim,
        generator_model = %config.generator_model,
        threshold = config.context_threshold,
        "Starting StreamRAG API server"
    );

    let state = Arc::new(AppState::new(embedder, store, templates, generator, config));

    let app = create_router(state).layer(CorsLayer::permissive());

    let port: u16 = env::var("STREAMRAG_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8000);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.unwrap();
}
