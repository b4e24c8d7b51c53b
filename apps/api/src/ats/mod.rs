//! ATS scoring and resume optimization.
//!
//! Scoring fans out three model stages concurrently (requirements, resume
//! entities, semantic judge), scores locally, and asks for keyword placement
//! advice only when keywords are missing. The optimizer builds on a scoring
//! run to rewrite the resume.

pub mod company;
pub mod extraction;
pub mod handlers;
pub mod models;
pub mod optimizer;
pub mod pipeline;
pub mod placement;
pub mod prompts;
pub mod scoring;
pub mod semantic;
