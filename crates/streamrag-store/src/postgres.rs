//! PostgreSQL + pgvector backend

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use streamrag_core::error::{Result, StreamragError};
use streamrag_core::models::RetrievedPassage;
use uuid::Uuid;

use crate::pgvector;
use crate::ports::{PassageEntry, VectorStore};

/// Vector store backed by PostgreSQL with the pgvector extension
///
/// The pool is shared; each operation acquires a connection per call and
/// releases it on every exit path, including failure.
pub struct PostgresStore {
    pool: PgPool,
    table: String,
    dimensions: usize,
}

impl PostgresStore {
    /// Connect to PostgreSQL and build a store over the given table
    ///
    /// The table name is interpolated into SQL text (it cannot be a bind
    /// parameter), so it must be a plain identifier.
    pub async fn connect(
        database_url: &str,
        table: impl Into<String>,
        dimensions: usize,
    ) -> Result<Self> {
        let table = table.into();
        validate_identifier(&table)?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| StreamragError::Retrieval {
                reason: format!("Failed to connect to PostgreSQL: {}", e),
            })?;

        Ok(Self {
            pool,
            table,
            dimensions,
        })
    }

    /// The table this store reads and writes
    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl VectorStore for PostgresStore {
    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await
            .map_err(|e| StreamragError::Retrieval {
                reason: format!("Failed to create vector extension: {}", e),
            })?;

        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id UUID PRIMARY KEY,
                text TEXT NOT NULL,
                created_at TIMESTAMPTZ DEFAULT now() NOT NULL,
                embedding vector({dim})
            )",
            table = self.table,
            dim = self.dimensions,
        );
        sqlx::query(&create_table).execute(&self.pool).await.map_err(|e| {
            StreamragError::Retrieval {
                reason: format!("Failed to create table '{}': {}", self.table, e),
            }
        })?;

        let create_index = format!(
            "CREATE INDEX IF NOT EXISTS {table}_embedding_ivfflat
                ON {table} USING ivfflat (embedding vector_cosine_ops)
                WITH (lists = 100)",
            table = self.table,
        );
        sqlx::query(&create_index).execute(&self.pool).await.map_err(|e| {
            StreamragError::Retrieval {
                reason: format!("Failed to create vector index: {}", e),
            }
        })?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query(&format!("TRUNCATE {}", self.table))
            .execute(&self.pool)
            .await
            .map_err(|e| StreamragError::Retrieval {
                reason: format!("Failed to clear table '{}': {}", self.table, e),
            })?;
        Ok(())
    }

    async fn insert(&self, entries: &[PassageEntry]) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }

        // Validate the whole batch before touching the store: a dimension
        // mismatch must never result in a partial insert.
        for entry in entries {
            if entry.embedding.len() != self.dimensions {
                return Err(StreamragError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: entry.embedding.len(),
                });
            }
        }

        let mut tx = self.pool.begin().await.map_err(|e| StreamragError::Retrieval {
            reason: format!("Failed to begin transaction: {}", e),
        })?;

        let insert_sql = format!(
            "INSERT INTO {table} (id, text, embedding)
             VALUES ($1, $2, CAST($3 AS vector({dim})))",
            table = self.table,
            dim = self.dimensions,
        );

        for entry in entries {
            let literal = pgvector::encode(&entry.embedding)?;
            sqlx::query(&insert_sql)
                .bind(Uuid::new_v4())
                .bind(&entry.text)
                .bind(literal)
                .execute(&mut *tx)
                .await
                .map_err(|e| StreamragError::Retrieval {
                    reason: format!("Failed to insert passage: {}", e),
                })?;
        }

        tx.commit().await.map_err(|e| StreamragError::Retrieval {
            reason: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(entries.len())
    }

    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedPassage>> {
        let literal = pgvector::encode(query)?;

        let search_sql = format!(
            "SELECT text, 1 - (embedding <=> CAST($1 AS vector({dim}))) AS similarity
             FROM {table}
             ORDER BY embedding <=> CAST($1 AS vector({dim}))
             LIMIT $2",
            table = self.table,
            dim = self.dimensions,
        );

        let rows = sqlx::query(&search_sql)
            .bind(&literal)
            .bind(k as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StreamragError::Retrieval {
                reason: format!("Similarity search failed on '{}': {}", self.table, e),
            })?;

        let passages = rows
            .into_iter()
            .map(|row| {
                let text: String = row.get("text");
                let similarity: f64 = row.get("similarity");
                RetrievedPassage {
                    text,
                    similarity: similarity as f32,
                }
            })
            .collect();

        Ok(passages)
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", self.table))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StreamragError::Retrieval {
                reason: format!("Failed to count passages: {}", e),
            })?;
        Ok(count as usize)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn validate_identifier(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(StreamragError::ConfigInvalid {
            key: "STREAMRAG_TABLE".to_string(),
            reason: format!("'{}' is not a valid table identifier", table),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(validate_identifier("passages").is_ok());
        assert!(validate_identifier("demo_chunks").is_ok());
        assert!(validate_identifier("_t2").is_ok());
    }

    #[test]
    fn rejects_injection_prone_identifiers() {
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("2passages").is_err());
        assert!(validate_identifier("passages; DROP TABLE users").is_err());
        assert!(validate_identifier("pass-ages").is_err());
    }
}
