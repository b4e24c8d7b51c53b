use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, StoreError};

/// Process-local document store. Used when no `DATABASE_URL` is configured
/// and by the handler tests. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    records: RwLock<HashMap<String, Value>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn paths(&self) -> Vec<String> {
        self.records.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.records.read().await.get(path).cloned())
    }

    async fn set(&self, path: &str, record: Value) -> Result<(), StoreError> {
        self.records.write().await.insert(path.to_string(), record);
        Ok(())
    }

    async fn add_to_collection(
        &self,
        collection: &str,
        record: Value,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.records
            .write()
            .await
            .insert(format!("{collection}/{id}"), record);
        Ok(id)
    }
}
