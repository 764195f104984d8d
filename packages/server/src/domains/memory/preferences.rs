//! Append-if-absent preference memory over a [`DocumentStore`].

use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde_json::Value;
use tracing::{debug, info};

use super::store::DocumentStore;

/// Mediates all reads and writes of preference documents.
///
/// No in-process cache: every call is a store round trip. Concurrent writers
/// to the same entity can race (read-modify-write with no locking); callers
/// must tolerate lost updates.
#[derive(Clone)]
pub struct PreferenceStore {
    store: Arc<dyn DocumentStore>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Append `value` to the category list for `entity_id` unless an equal
    /// value is already present.
    pub async fn add(&self, entity_id: &str, category: &str, value: Value) -> Result<bool> {
        let mut doc = self
            .store
            .get(entity_id)
            .await?
            .unwrap_or_else(|| Value::Object(Default::default()));

        {
            let obj = doc
                .as_object_mut()
                .ok_or_else(|| anyhow!("document for '{entity_id}' is not an object"))?;
            let list = obj
                .entry(category.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            let items = list
                .as_array_mut()
                .ok_or_else(|| anyhow!("category '{category}' is not a list"))?;

            if items.iter().any(|existing| existing == &value) {
                debug!(
                    entity_id = %entity_id,
                    category = %category,
                    "Value already stored, skipping"
                );
                return Ok(true);
            }
            items.push(value);
        }

        self.store.upsert(entity_id, doc).await?;
        info!(
            entity_id = %entity_id,
            category = %category,
            "Saved value to memory"
        );

        Ok(true)
    }

    /// All values stored under `category` for `entity_id`.
    ///
    /// A missing document or category is an empty list, not an error.
    pub async fn search_by_category(&self, entity_id: &str, category: &str) -> Result<Vec<Value>> {
        let results = self
            .store
            .get(entity_id)
            .await?
            .and_then(|doc| doc.get(category).cloned())
            .and_then(|list| list.as_array().cloned())
            .unwrap_or_default();

        info!(
            entity_id = %entity_id,
            category = %category,
            count = results.len(),
            "Retrieved values from memory"
        );

        Ok(results)
    }
}
