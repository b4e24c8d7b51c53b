//! Value types that flow between pipeline stages.
//!
//! Field names follow the JSON the frontend and the persisted analysis
//! records already use, so the serde renames are part of the contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured requirements extracted from a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequirements {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_level: String,
}

/// Structured entities extracted from a resume.
/// Experience and education records are free-form; only presence is scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeEntities {
    pub skills: Vec<String>,
    pub experience: Vec<Value>,
    pub education: Vec<Value>,
}

/// Model-judged similarity between a resume and a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticAnalysis {
    /// 0 – 100. Out-of-range values are clamped when combined.
    pub similarity_score: i64,
    pub explanation: String,
}

/// Output of the keyword scorer. Internal to a scoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordAnalysis {
    pub score: f64,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordPlacementSuggestion {
    pub keyword: String,
    pub suggested_location: String,
    pub example_sentence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordPlacementResponse {
    pub suggestions: Vec<KeywordPlacementSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub keyword_score: f64,
    pub semantic_score: f64,
    pub formatting_score: f64,
}

/// Aggregate result of one ATS scoring run. Never mutated after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsResult {
    pub overall_score: f64,
    pub breakdown: ScoreBreakdown,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(rename = "keyword_placement_suggestions", default)]
    pub keyword_placement_suggestions: Option<Vec<KeywordPlacementSuggestion>>,
}

/// Keyword and tone signals scraped from a company website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyAnalysis {
    pub company_keywords: Vec<String>,
    pub company_tone: String,
}

/// Rewritten resume text produced by the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedResume {
    pub resume_text: String,
}
