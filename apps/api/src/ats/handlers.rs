//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::ats::models::AtsResult;
use crate::ats::optimizer::run_optimization;
use crate::ats::pipeline::run_ats_scoring;
use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::state::AppState;
use crate::store::{analyses_collection, document_path};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Authentication happens upstream; the caller's id arrives as `?user_id=`.
#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AtsScoreRequest {
    pub job_description: String,
    /// Accepted for forward compatibility; does not affect the score.
    #[serde(default)]
    pub profile_keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeResumeRequest {
    pub job_description: String,
    pub company_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResumeResponse {
    pub optimized_text: String,
}

/// One ATS run as returned by the read endpoint. Stored under
/// `.../documents/{id}/analyses/{analysis_id}`; `id` is filled from the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    pub created_at: String,
    pub job_description: String,
    pub result: AtsResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis/ats-score/:document_id
///
/// Scores the stored resume against a job description, persists the
/// analysis under the document, and returns the result.
pub async fn handle_ats_score(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    AppQuery(params): AppQuery<UserIdQuery>,
    AppJson(request): AppJson<AtsScoreRequest>,
) -> Result<Json<AtsResult>, AppError> {
    require_job_description(&request.job_description)?;

    let resume_text = load_resume_text(&state, &params.user_id, &document_id).await?;

    let result = run_ats_scoring(
        &resume_text,
        &request.job_description,
        &request.profile_keywords,
        state.model.as_ref(),
    )
    .await?;

    // Persist only once the whole pipeline has succeeded
    let collection = analyses_collection(&params.user_id, &document_id);
    let record = serde_json::json!({
        "createdAt": Utc::now().to_rfc3339(),
        "jobDescription": request.job_description,
        "result": result,
    });
    let analysis_id = state.store.add_to_collection(&collection, record).await?;

    info!(
        "Stored ATS analysis {analysis_id} for document {document_id} (score {:.2})",
        result.overall_score
    );

    Ok(Json(result))
}

/// GET /api/v1/analysis/ats-score/:document_id/:analysis_id
///
/// Returns a previously persisted analysis record.
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path((document_id, analysis_id)): Path<(String, String)>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<AnalysisRecord>, AppError> {
    let path = format!(
        "{}/{analysis_id}",
        analyses_collection(&params.user_id, &document_id)
    );
    let mut stored = state
        .store
        .get(&path)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {analysis_id} not found")))?;
    // The id is the last path segment, not part of the stored body
    if let Some(fields) = stored.as_object_mut() {
        fields.insert("id".to_string(), Value::String(analysis_id.clone()));
    }

    let record = serde_json::from_value(stored).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Stored analysis {analysis_id} is malformed: {e}"))
    })?;
    Ok(Json(record))
}

/// POST /api/v1/analysis/optimize-resume/:document_id
///
/// Runs an ATS pass and rewrites the resume around the missing keywords,
/// optionally tuned to the company's website. Nothing is persisted.
pub async fn handle_optimize_resume(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    AppQuery(params): AppQuery<UserIdQuery>,
    AppJson(request): AppJson<OptimizeResumeRequest>,
) -> Result<Json<OptimizeResumeResponse>, AppError> {
    require_job_description(&request.job_description)?;

    let resume_text = load_resume_text(&state, &params.user_id, &document_id).await?;

    let optimized = run_optimization(
        &resume_text,
        &request.job_description,
        request.company_url.as_deref(),
        state.model.as_ref(),
        &state.company_analyzer,
    )
    .await?;

    Ok(Json(OptimizeResumeResponse {
        optimized_text: optimized.resume_text,
    }))
}

fn require_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Reads the resume text from a stored document: `content`, falling back to
/// `extractedText`.
async fn load_resume_text(
    state: &AppState,
    user_id: &str,
    document_id: &str,
) -> Result<String, AppError> {
    let document = state
        .store
        .get(&document_path(user_id, document_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Resume document not found.".to_string()))?;

    ["content", "extractedText"]
        .iter()
        .filter_map(|field| document.get(*field).and_then(Value::as_str))
        .find(|text| !text.trim().is_empty())
        .map(str::to_owned)
        .ok_or_else(|| {
            AppError::Validation(
                "The selected document has no text content to analyze.".to_string(),
            )
        })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
