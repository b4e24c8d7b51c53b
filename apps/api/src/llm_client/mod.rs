/// LLM Client — the single point of entry for all generative-model calls.
///
/// ARCHITECTURAL RULE: No other module may call the model API directly.
/// Pipeline stages depend on the `ModelClient` trait, never on `LlmClient`,
/// so each orchestrator can be driven by a scripted model in tests.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// True when the model could not be reached or refused the call,
    /// as opposed to answering with content we cannot use.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            LlmError::Http(_) | LlmError::Api { .. } | LlmError::RateLimited { .. }
        )
    }
}

/// Anything that can turn a (system, prompt) pair into model text.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: Option<f32>,
    ) -> Result<String, LlmError>;
}

/// Calls the model and deserializes the text response as JSON into `T`.
/// The prompt must instruct the model to return valid JSON.
pub async fn call_json<T: DeserializeOwned>(
    model: &dyn ModelClient,
    system: &str,
    prompt: &str,
    temperature: Option<f32>,
) -> Result<T, LlmError> {
    let text = model.complete(system, prompt, temperature).await?;
    if text.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }

    // Strip markdown code fences if the model wraps JSON in them
    serde_json::from_str(strip_json_fences(&text)).map_err(LlmError::Parse)
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Production model client over the Anthropic Messages API.
/// Constructed once in `main` and shared through `AppState`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()?,
            api_key,
            api_url: ANTHROPIC_API_URL.to_string(),
        })
    }

    /// Makes a raw call to the API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    /// Unparseable content is never retried here.
    pub async fn call(
        &self,
        system: &str,
        prompt: &str,
        temperature: Option<f32>,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            temperature,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.api_url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            // A 200 whose body is not a Messages response is bad output, not an outage
            let body = response.text().await?;
            let llm_response: LlmResponse = serde_json::from_str(&body)?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl ModelClient for LlmClient {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: Option<f32>,
    ) -> Result<String, LlmError> {
        let response = self.call(system, prompt, temperature).await?;
        response
            .text()
            .map(str::to_owned)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Scripted model for pipeline tests. Responses are keyed by the system
/// prompt of the stage that asks, and every call is counted per stage.
#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{LlmError, ModelClient};

    #[derive(Default)]
    pub struct ScriptedModel {
        responses: Mutex<HashMap<String, Result<String, u16>>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedModel {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer calls made with `system` with `body`.
        pub fn respond(self, system: &str, body: impl Into<String>) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(system.to_string(), Ok(body.into()));
            self
        }

        /// Fail calls made with `system` with an API error of `status`.
        pub fn fail(self, system: &str, status: u16) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(system.to_string(), Err(status));
            self
        }

        pub fn calls_for(&self, system: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(s, _)| s == system)
                .count()
        }

        /// The prompts sent with `system`, in call order.
        pub fn prompts_for(&self, system: &str) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(s, _)| s == system)
                .map(|(_, p)| p.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedModel {
        async fn complete(
            &self,
            system: &str,
            prompt: &str,
            _temperature: Option<f32>,
        ) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));

            match self.responses.lock().unwrap().get(system) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(LlmError::Api {
                    status: *status,
                    message: "scripted failure".to_string(),
                }),
                None => Err(LlmError::EmptyContent),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedModel;
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        key: String,
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[tokio::test]
    async fn test_call_json_parses_fenced_output() {
        let model = ScriptedModel::new().respond("sys", "```json\n{\"key\": \"v\"}\n```");
        let sample: Sample = call_json(&model, "sys", "prompt", None).await.unwrap();
        assert_eq!(sample.key, "v");
    }

    #[tokio::test]
    async fn test_call_json_shape_mismatch_is_parse_error() {
        let model = ScriptedModel::new().respond("sys", "{\"other\": 1}");
        let err = call_json::<Sample>(&model, "sys", "prompt", None)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
        assert!(!err.is_unavailable());
    }

    #[tokio::test]
    async fn test_call_json_blank_output_is_empty_content() {
        let model = ScriptedModel::new().respond("sys", "   ");
        let err = call_json::<Sample>(&model, "sys", "prompt", None)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    /// Serves `body` with status 200 for any POST on an ephemeral local port.
    async fn serve_messages(body: &'static str) -> String {
        use axum::{routing::post, Router};

        let app = Router::new().route("/v1/messages", post(move || async move { body }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1/messages")
    }

    fn local_client(api_url: String) -> LlmClient {
        LlmClient {
            client: Client::builder().no_proxy().build().unwrap(),
            api_key: "test-key".to_string(),
            api_url,
        }
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_output_error() {
        let client = local_client(serve_messages("<html>gateway page</html>").await);
        let err = client.complete("sys", "prompt", None).await.unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)), "got {err:?}");
        assert!(!err.is_unavailable());
    }

    #[tokio::test]
    async fn test_success_body_yields_first_text_block() {
        let client = local_client(
            serve_messages(
                r#"{"content": [{"type": "text", "text": "{\"key\": \"v\"}"}],
                    "usage": {"input_tokens": 3, "output_tokens": 5}}"#,
            )
            .await,
        );
        let sample: Sample = call_json(&client, "sys", "prompt", None).await.unwrap();
        assert_eq!(sample.key, "v");
    }

    #[test]
    fn test_api_error_is_unavailable() {
        let err = LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert!(err.is_unavailable());
        assert!(LlmError::RateLimited { retries: 3 }.is_unavailable());
    }
}
