//! StreamRAG API - HTTP transport over the answer pipeline

pub mod error;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
