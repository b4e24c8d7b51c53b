use std::sync::Arc;

use crate::ats::company::CompanyAnalyzer;
use crate::llm_client::ModelClient;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres-backed in production; in-memory when no DATABASE_URL is set.
    pub store: Arc<dyn DocumentStore>,
    pub model: Arc<dyn ModelClient>,
    pub company_analyzer: CompanyAnalyzer,
}
