//! Semantic judge — asks the model for a 0–100 resume/job similarity rating.

use crate::ats::models::SemanticAnalysis;
use crate::ats::prompts::{SEMANTIC_PROMPT_TEMPLATE, SEMANTIC_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, UNTRUSTED_INPUT_INSTRUCTION};
use crate::llm_client::{call_json, ModelClient};

/// Rates semantic similarity. No local fallback: a failed or malformed
/// answer fails the whole scoring run.
pub async fn judge_similarity(
    resume_text: &str,
    job_description: &str,
    model: &dyn ModelClient,
) -> Result<SemanticAnalysis, AppError> {
    let prompt = fill_template(
        SEMANTIC_PROMPT_TEMPLATE,
        &[
            ("untrusted_input", UNTRUSTED_INPUT_INSTRUCTION),
            ("job_description", job_description),
            ("resume_text", resume_text),
        ],
    );
    call_json(model, SEMANTIC_SYSTEM, &prompt, None)
        .await
        .map_err(|e| AppError::model("Semantic judging failed", e))
}
