//! Requirement and entity extraction: one model call each, typed at the boundary.
//!
//! Neither extractor retries on its own: a response that does not parse into
//! the expected shape fails the stage and the caller surfaces it.

use crate::ats::models::{JobRequirements, ResumeEntities};
use crate::ats::prompts::{
    ENTITIES_PROMPT_TEMPLATE, ENTITIES_SYSTEM, REQUIREMENTS_PROMPT_TEMPLATE, REQUIREMENTS_SYSTEM,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, UNTRUSTED_INPUT_INSTRUCTION};
use crate::llm_client::{call_json, ModelClient};

/// Extracts required/preferred skills and experience level from a job description.
/// Rejecting blank input is the caller's job.
pub async fn extract_job_requirements(
    job_description: &str,
    model: &dyn ModelClient,
) -> Result<JobRequirements, AppError> {
    let prompt = fill_template(
        REQUIREMENTS_PROMPT_TEMPLATE,
        &[
            ("untrusted_input", UNTRUSTED_INPUT_INSTRUCTION),
            ("job_description", job_description),
        ],
    );
    call_json(model, REQUIREMENTS_SYSTEM, &prompt, None)
        .await
        .map_err(|e| AppError::model("Job requirement extraction failed", e))
}

/// Extracts skills, experience and education records from resume text.
pub async fn extract_resume_entities(
    resume_text: &str,
    model: &dyn ModelClient,
) -> Result<ResumeEntities, AppError> {
    let prompt = fill_template(
        ENTITIES_PROMPT_TEMPLATE,
        &[
            ("untrusted_input", UNTRUSTED_INPUT_INSTRUCTION),
            ("resume_text", resume_text),
        ],
    );
    call_json(model, ENTITIES_SYSTEM, &prompt, None)
        .await
        .map_err(|e| AppError::model("Resume entity extraction failed", e))
}
