//! Document store — path-addressed JSON records.
//!
//! Records live at slash-separated paths (`users/{uid}/documents/{doc_id}`).
//! A collection is a path prefix; `add_to_collection` stores a record under a
//! freshly generated id inside it.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryDocumentStore;
pub use postgres::PgDocumentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row".to_string()),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Carried in `AppState` as `Arc<dyn DocumentStore>`. Implementations must be
/// safe for concurrent use; no transaction spans multiple calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, path: &str, record: Value) -> Result<(), StoreError>;

    /// Stores `record` under a new id inside `collection` and returns the id.
    async fn add_to_collection(&self, collection: &str, record: Value)
        -> Result<String, StoreError>;
}

/// Path of a user's uploaded document.
pub fn document_path(user_id: &str, document_id: &str) -> String {
    format!("users/{user_id}/documents/{document_id}")
}

/// Collection holding the ATS analyses run against a document.
pub fn analyses_collection(user_id: &str, document_id: &str) -> String {
    format!("{}/analyses", document_path(user_id, document_id))
}

/// Splits a record path into (collection, id).
pub(crate) fn split_path(path: &str) -> (&str, &str) {
    path.rsplit_once('/').unwrap_or(("", path))
}
