//! Document store backends.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

/// A key-addressed JSON document store.
///
/// A missing document is `Ok(None)`, never an error; upsert replaces the
/// whole document. The backing client must be safe for concurrent use.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load a document by key.
    async fn get(&self, id: &str) -> Result<Option<Value>>;

    /// Insert or replace the document stored under `id`.
    async fn upsert(&self, id: &str, doc: Value) -> Result<()>;

    /// Cheap connectivity check for health reporting.
    async fn ping(&self) -> Result<()>;
}

/// Postgres-backed document store: one JSONB row per entity key.
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, id: &str) -> Result<Option<Value>> {
        let doc = sqlx::query_scalar::<_, Value>("SELECT doc FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to load document")?;

        Ok(doc)
    }

    async fn upsert(&self, id: &str, doc: Value) -> Result<()> {
        sqlx::query(
            "INSERT INTO documents (id, doc) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc, updated_at = now()",
        )
        .bind(id)
        .bind(doc)
        .execute(&self.pool)
        .await
        .context("Failed to upsert document")?;

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Document store ping failed")?;
        Ok(())
    }
}

/// In-memory document store for testing and development.
///
/// Data is lost on restart; not suitable for production.
pub struct MemoryDocumentStore {
    docs: RwLock<HashMap<String, Value>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.docs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().unwrap().is_empty()
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, id: &str) -> Result<Option<Value>> {
        Ok(self.docs.read().unwrap().get(id).cloned())
    }

    async fn upsert(&self, id: &str, doc: Value) -> Result<()> {
        self.docs.write().unwrap().insert(id.to_string(), doc);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_round_trips_documents() {
        let store = MemoryDocumentStore::new();

        assert!(store.get("user::a").await.unwrap().is_none());

        store
            .upsert("user::a", json!({"travel_preferences": ["aisle"]}))
            .await
            .unwrap();

        let doc = store.get("user::a").await.unwrap().unwrap();
        assert_eq!(doc["travel_preferences"][0], "aisle");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn upsert_replaces_existing_document() {
        let store = MemoryDocumentStore::new();
        store.upsert("k", json!({"a": 1})).await.unwrap();
        store.upsert("k", json!({"b": 2})).await.unwrap();

        let doc = store.get("k").await.unwrap().unwrap();
        assert!(doc.get("a").is_none());
        assert_eq!(doc["b"], 2);
    }
}
