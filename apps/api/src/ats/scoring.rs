//! Keyword and formatting scorers. Pure functions, no model calls.

use std::collections::HashSet;

use crate::ats::models::{JobRequirements, KeywordAnalysis, ResumeEntities};

/// Share of the keyword score carried by required skills.
const REQUIRED_WEIGHT: f64 = 0.8;
/// Share of the keyword score carried by preferred skills.
const PREFERRED_WEIGHT: f64 = 0.2;

/// Section points in tenths so the three always sum to exactly 100.0.
const SKILLS_TENTHS: u32 = 333;
const EXPERIENCE_TENTHS: u32 = 333;
const EDUCATION_TENTHS: u32 = 334;

/// Scores resume skills against job requirements.
///
/// Algorithm:
/// 1. Case-insensitive membership of each required/preferred skill in `resume_skills`
/// 2. required = 0.8 × matched/total (flat 0.8 when the job lists none)
/// 3. preferred = 0.2 × matched/total (flat 0.2 when the job lists none)
/// 4. score = min((required + preferred) × 100, 100)
///
/// Matched and missing partition required ++ preferred in order; a skill
/// listed in both appears twice.
///
/// `_profile_keywords` is accepted but does not influence the score.
pub fn score_keywords(
    resume_skills: &[String],
    requirements: &JobRequirements,
    _profile_keywords: &[String],
) -> KeywordAnalysis {
    let resume_lower: HashSet<String> = resume_skills.iter().map(|s| s.to_lowercase()).collect();

    let (required_matched, required_missing) =
        partition_skills(&requirements.required_skills, &resume_lower);
    let (preferred_matched, preferred_missing) =
        partition_skills(&requirements.preferred_skills, &resume_lower);

    let required_score = component_score(
        required_matched.len(),
        requirements.required_skills.len(),
        REQUIRED_WEIGHT,
    );
    let preferred_score = component_score(
        preferred_matched.len(),
        requirements.preferred_skills.len(),
        PREFERRED_WEIGHT,
    );

    let score = ((required_score + preferred_score) * 100.0).min(100.0);

    KeywordAnalysis {
        score,
        matched_keywords: [required_matched, preferred_matched].concat(),
        missing_keywords: [required_missing, preferred_missing].concat(),
    }
}

/// Awards 33.3 / 33.3 / 33.4 for non-empty skills / experience / education.
/// Presence is binary; there is no partial credit within a section.
pub fn score_formatting(entities: &ResumeEntities) -> f64 {
    let mut tenths = 0;
    if !entities.skills.is_empty() {
        tenths += SKILLS_TENTHS;
    }
    if !entities.experience.is_empty() {
        tenths += EXPERIENCE_TENTHS;
    }
    if !entities.education.is_empty() {
        tenths += EDUCATION_TENTHS;
    }
    (f64::from(tenths) / 10.0).min(100.0)
}

fn partition_skills(skills: &[String], resume_lower: &HashSet<String>) -> (Vec<String>, Vec<String>) {
    skills
        .iter()
        .cloned()
        .partition(|skill| resume_lower.contains(&skill.to_lowercase()))
}

fn component_score(matched: usize, total: usize, weight: f64) -> f64 {
    if total == 0 {
        // Under-specified job descriptions get full credit for the component
        weight
    } else {
        weight * (matched as f64 / total as f64)
    }
}
