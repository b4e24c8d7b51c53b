//! Resume Optimizer — rewrites a resume around the keywords an ATS pass found missing.
//!
//! Flow: run_ats_scoring → (no missing keywords → 400) → company analysis
//!       (best-effort) → one rewrite call under the no-fabrication rule.

use tracing::{info, warn};

use crate::ats::company::CompanyAnalyzer;
use crate::ats::models::{CompanyAnalysis, OptimizedResume};
use crate::ats::pipeline::run_ats_scoring;
use crate::ats::prompts::{
    COMPANY_INSIGHTS_TEMPLATE, OPTIMIZER_PROMPT_TEMPLATE, OPTIMIZER_SYSTEM,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{
    fill_template, NO_FABRICATION_INSTRUCTION, UNTRUSTED_INPUT_INSTRUCTION,
};
use crate::llm_client::{call_json, ModelClient};

const OPTIMIZER_TEMPERATURE: f32 = 0.2;

/// Full optimization flow behind `POST /analysis/optimize-resume`.
///
/// A failed company analysis never aborts the flow; the rewrite simply
/// goes ahead without company insights.
pub async fn run_optimization(
    resume_text: &str,
    job_description: &str,
    company_url: Option<&str>,
    model: &dyn ModelClient,
    company_analyzer: &CompanyAnalyzer,
) -> Result<OptimizedResume, AppError> {
    let ats_result = run_ats_scoring(resume_text, job_description, &[], model).await?;

    if ats_result.missing_keywords.is_empty() {
        return Err(AppError::Validation(
            "The resume already contains every keyword from the job description; \
            there is nothing to optimize."
                .to_string(),
        ));
    }

    let company = match company_url.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => match company_analyzer.analyze(url, model).await {
            Ok(analysis) => {
                info!(
                    "Company analysis for {url}: {} keywords, tone={:?}",
                    analysis.company_keywords.len(),
                    analysis.company_tone
                );
                Some(analysis)
            }
            Err(e) => {
                warn!("Company analysis failed, optimizing without company insights: {e}");
                None
            }
        },
        None => None,
    };

    optimize_resume(
        resume_text,
        &ats_result.missing_keywords,
        job_description,
        company.as_ref(),
        model,
    )
    .await
}

/// Rewrites `resume_text` to work in `missing_keywords` and, when available,
/// the company's keywords and tone.
///
/// An empty `missing_keywords` is a terminal "nothing to optimize" condition
/// reported as a validation error.
pub async fn optimize_resume(
    resume_text: &str,
    missing_keywords: &[String],
    job_description: &str,
    company: Option<&CompanyAnalysis>,
    model: &dyn ModelClient,
) -> Result<OptimizedResume, AppError> {
    if missing_keywords.is_empty() {
        return Err(AppError::Validation(
            "No missing keywords were supplied; there is nothing to optimize.".to_string(),
        ));
    }

    let prompt = build_optimizer_prompt(resume_text, missing_keywords, job_description, company);

    let optimized: OptimizedResume =
        call_json(model, OPTIMIZER_SYSTEM, &prompt, Some(OPTIMIZER_TEMPERATURE))
            .await
            .map_err(|e| AppError::model("Resume optimization failed", e))?;

    if optimized.resume_text.trim().is_empty() {
        return Err(AppError::ModelOutput(
            "Resume optimization failed: model returned an empty resume".to_string(),
        ));
    }

    info!(
        "Optimized resume: {} → {} chars, {} keywords targeted",
        resume_text.len(),
        optimized.resume_text.len(),
        missing_keywords.len()
    );
    Ok(optimized)
}

fn build_optimizer_prompt(
    resume_text: &str,
    missing_keywords: &[String],
    job_description: &str,
    company: Option<&CompanyAnalysis>,
) -> String {
    let company_insights = company
        .filter(|c| !c.company_keywords.is_empty() && !c.company_tone.trim().is_empty())
        .map(|c| {
            fill_template(
                COMPANY_INSIGHTS_TEMPLATE,
                &[
                    ("company_keywords", c.company_keywords.join(", ").as_str()),
                    ("company_tone", c.company_tone.as_str()),
                ],
            )
        })
        .unwrap_or_default();
    let keywords = missing_keywords.join(", ");

    fill_template(
        OPTIMIZER_PROMPT_TEMPLATE,
        &[
            ("untrusted_input", UNTRUSTED_INPUT_INSTRUCTION),
            ("no_fabrication", NO_FABRICATION_INSTRUCTION),
            ("company_insights", company_insights.as_str()),
            ("missing_keywords", keywords.as_str()),
            ("job_description", job_description),
            ("resume_text", resume_text),
        ],
    )
}
