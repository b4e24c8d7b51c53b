use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{split_path, DocumentStore, StoreError};

/// Postgres-backed document store. One JSONB row per record path,
/// see `migrations/0001_documents.sql`.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert(&self, path: &str, record: &Value) -> Result<(), StoreError> {
        let (collection, _) = split_path(path);
        sqlx::query(
            r#"
            INSERT INTO documents (path, collection, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (path) DO UPDATE
                SET data = EXCLUDED.data, updated_at = now()
            "#,
        )
        .bind(path)
        .bind(collection)
        .bind(record)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let row: Option<(Value,)> = sqlx::query_as("SELECT data FROM documents WHERE path = $1")
            .bind(path)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(data,)| data))
    }

    async fn set(&self, path: &str, record: Value) -> Result<(), StoreError> {
        self.upsert(path, &record).await
    }

    async fn add_to_collection(
        &self,
        collection: &str,
        record: Value,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let path = format!("{collection}/{id}");
        self.upsert(&path, &record).await?;
        debug!("Stored record {path}");
        Ok(id)
    }
}
