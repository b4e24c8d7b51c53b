//! ATS Orchestrator — scores one resume against one job description.
//!
//! Flow: extracting (requirements ∥ entities ∥ semantic judge) → scoring
//!       (keyword + formatting) → placement (only when keywords are missing)
//!       → assembling (weighted combination + recommendations).
//!
//! Nothing is persisted here. The caller stores the finished `AtsResult`,
//! so a failure at any stage leaves no committed state.

use tracing::{info, warn};

use crate::ats::extraction::{extract_job_requirements, extract_resume_entities};
use crate::ats::models::{
    AtsResult, KeywordAnalysis, KeywordPlacementSuggestion, ScoreBreakdown, SemanticAnalysis,
};
use crate::ats::placement::suggest_keyword_placement;
use crate::ats::scoring::{score_formatting, score_keywords};
use crate::ats::semantic::judge_similarity;
use crate::errors::AppError;
use crate::llm_client::ModelClient;

/// Outer weighting of the three breakdown components. Fixed, not configurable.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub keyword: f64,
    pub semantic: f64,
    pub formatting: f64,
}

pub const SCORE_WEIGHTS: ScoreWeights = ScoreWeights {
    keyword: 0.45,
    semantic: 0.35,
    formatting: 0.20,
};

/// Semantic scores below this trigger an alignment recommendation.
const SEMANTIC_RECOMMENDATION_THRESHOLD: f64 = 70.0;

const MISSING_KEYWORDS_RECOMMENDATION: &str = "Incorporate missing keywords to better match \
    the job requirements. See suggestions below for how to add them.";
const FORMATTING_RECOMMENDATION: &str =
    "Ensure your resume includes clear sections for Skills, Work Experience, and Education.";

/// Runs the full ATS scoring pipeline.
///
/// Steps:
/// 1. Requirement extraction, entity extraction and semantic judging run
///    concurrently; the first failure cancels the rest and fails the run.
/// 2. Keyword and formatting scores are computed locally.
/// 3. If any keyword is missing, placement advice is requested. Its failure
///    is logged and the result carries no suggestions.
/// 4. Components are clamped, weighted 0.45 / 0.35 / 0.20 and rounded.
pub async fn run_ats_scoring(
    resume_text: &str,
    job_description: &str,
    profile_keywords: &[String],
    model: &dyn ModelClient,
) -> Result<AtsResult, AppError> {
    // Step 1: Extract and judge
    let (requirements, entities, semantic) = tokio::try_join!(
        extract_job_requirements(job_description, model),
        extract_resume_entities(resume_text, model),
        judge_similarity(resume_text, job_description, model),
    )?;
    info!(
        "Extraction done: {} required, {} preferred, {} resume skills, semantic={}",
        requirements.required_skills.len(),
        requirements.preferred_skills.len(),
        entities.skills.len(),
        semantic.similarity_score
    );

    // Step 2: Local scoring
    let keyword_analysis = score_keywords(&entities.skills, &requirements, profile_keywords);
    let formatting_score = score_formatting(&entities);

    // Step 3: Placement advice, only when there is something to place
    let placement = if keyword_analysis.missing_keywords.is_empty() {
        None
    } else {
        match suggest_keyword_placement(resume_text, &keyword_analysis.missing_keywords, model)
            .await
        {
            Ok(suggestions) => Some(suggestions),
            Err(e) => {
                warn!(
                    "Keyword placement failed for {} missing keywords, continuing without suggestions: {e}",
                    keyword_analysis.missing_keywords.len()
                );
                None
            }
        }
    };

    // Step 4: Assemble
    let result = assemble_result(keyword_analysis, &semantic, formatting_score, placement);
    info!(
        "ATS score {:.2} (keyword={:.2}, semantic={:.2}, formatting={:.2})",
        result.overall_score,
        result.breakdown.keyword_score,
        result.breakdown.semantic_score,
        result.breakdown.formatting_score
    );

    Ok(result)
}

/// Combines stage outputs into the final result.
fn assemble_result(
    keyword_analysis: KeywordAnalysis,
    semantic: &SemanticAnalysis,
    formatting_score: f64,
    placement: Option<Vec<KeywordPlacementSuggestion>>,
) -> AtsResult {
    let keyword_score = clamp_score(keyword_analysis.score);
    let semantic_score = clamp_score(semantic.similarity_score as f64);
    let formatting_score = clamp_score(formatting_score);

    let recommendations = build_recommendations(
        &keyword_analysis.missing_keywords,
        semantic_score,
        &semantic.explanation,
        formatting_score,
    );

    AtsResult {
        overall_score: compute_overall_score(keyword_score, semantic_score, formatting_score),
        breakdown: ScoreBreakdown {
            keyword_score: round2(keyword_score),
            semantic_score: round2(semantic_score),
            formatting_score: round2(formatting_score),
        },
        matched_keywords: keyword_analysis.matched_keywords,
        missing_keywords: keyword_analysis.missing_keywords,
        recommendations,
        keyword_placement_suggestions: placement,
    }
}

/// overall = round(clamp(0.45·keyword + 0.35·semantic + 0.20·formatting), 2),
/// each component clamped to [0, 100] first.
pub fn compute_overall_score(keyword: f64, semantic: f64, formatting: f64) -> f64 {
    let weighted = clamp_score(keyword) * SCORE_WEIGHTS.keyword
        + clamp_score(semantic) * SCORE_WEIGHTS.semantic
        + clamp_score(formatting) * SCORE_WEIGHTS.formatting;
    round2(clamp_score(weighted))
}

fn build_recommendations(
    missing_keywords: &[String],
    semantic_score: f64,
    semantic_explanation: &str,
    formatting_score: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();
    if !missing_keywords.is_empty() {
        recommendations.push(MISSING_KEYWORDS_RECOMMENDATION.to_string());
    }
    if semantic_score < SEMANTIC_RECOMMENDATION_THRESHOLD {
        recommendations.push(format!(
            "Improve the alignment of your experience with the job description. \
            The analysis noted: '{semantic_explanation}'"
        ));
    }
    if formatting_score < 100.0 {
        recommendations.push(FORMATTING_RECOMMENDATION.to_string());
    }
    recommendations
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
