//! Keyword placement advisor — proposes where each missing keyword belongs.
//!
//! Optional stage: the orchestrator treats `Err` as a degraded outcome and
//! continues without suggestions.

use crate::ats::models::{KeywordPlacementResponse, KeywordPlacementSuggestion};
use crate::ats::prompts::{PLACEMENT_PROMPT_TEMPLATE, PLACEMENT_SYSTEM};
use crate::llm_client::prompts::{fill_template, UNTRUSTED_INPUT_INSTRUCTION};
use crate::llm_client::{call_json, LlmError, ModelClient};

/// Asks the model for one suggestion per missing keyword.
/// Callers must not invoke this with an empty list.
pub async fn suggest_keyword_placement(
    resume_text: &str,
    missing_keywords: &[String],
    model: &dyn ModelClient,
) -> Result<Vec<KeywordPlacementSuggestion>, LlmError> {
    let keywords = missing_keywords.join(", ");
    let prompt = fill_template(
        PLACEMENT_PROMPT_TEMPLATE,
        &[
            ("untrusted_input", UNTRUSTED_INPUT_INSTRUCTION),
            ("missing_keywords", keywords.as_str()),
            ("resume_text", resume_text),
        ],
    );
    let response: KeywordPlacementResponse =
        call_json(model, PLACEMENT_SYSTEM, &prompt, None).await?;
    Ok(response.suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;

    #[tokio::test]
    async fn test_suggestions_are_unwrapped() {
        let model = ScriptedModel::new().respond(
            PLACEMENT_SYSTEM,
            r#"{"suggestions": [{
                "keyword": "Tableau",
                "suggested_location": "Skills section",
                "example_sentence": "Built executive dashboards in Tableau."
            }]}"#,
        );
        let missing = vec!["Tableau".to_string(), "dbt".to_string()];
        let suggestions = suggest_keyword_placement("resume", &missing, &model)
            .await
            .unwrap();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].keyword, "Tableau");
        assert!(model.prompts_for(PLACEMENT_SYSTEM)[0].contains("Tableau, dbt"));
    }

    #[tokio::test]
    async fn test_malformed_response_is_error() {
        let model = ScriptedModel::new().respond(PLACEMENT_SYSTEM, "not json");
        let result =
            suggest_keyword_placement("resume", &["Tableau".to_string()], &model).await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }
}
