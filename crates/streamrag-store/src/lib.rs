//! StreamRAG Store - Vector storage and similarity search
//!
//! This crate defines the vector store port, the pgvector literal codec
//! shared by the insert and search paths, and two backends: PostgreSQL
//! with pgvector (the system of record) and an in-memory store for
//! development and tests.

pub mod memory;
pub mod pgvector;
pub mod ports;
pub mod postgres;

pub use memory::MemoryVectorStore;
pub use ports::{PassageEntry, VectorStore};
pub use postgres::PostgresStore;
