//! Company analyzer — best-effort keyword/tone signals from a company website.
//!
//! Every failure here is non-fatal to its caller: the optimizer proceeds
//! without company insights.

use std::time::Duration;

use reqwest::Client;
use scraper::Html;
use thiserror::Error;
use tracing::debug;

use crate::ats::models::CompanyAnalysis;
use crate::ats::prompts::{COMPANY_PROMPT_TEMPLATE, COMPANY_SYSTEM};
use crate::llm_client::prompts::{fill_template, UNTRUSTED_INPUT_INSTRUCTION};
use crate::llm_client::{call_json, LlmError, ModelClient};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Website text sent to the model is cut to this many characters.
const MAX_WEBSITE_CHARS: usize = 4000;
const COMPANY_TEMPERATURE: f32 = 0.2;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Elements whose text is never visible on the page.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug, Error)]
pub enum CompanyAnalysisError {
    #[error("Failed to fetch URL {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not extract any text from {0}")]
    EmptyContent(String),

    #[error("Company analysis model call failed: {0}")]
    Model(#[from] LlmError),
}

/// Fetches and summarizes company websites. Cheap to clone.
#[derive(Clone)]
pub struct CompanyAnalyzer {
    http: Client,
}

impl CompanyAnalyzer {
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(http))
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Scrapes `url` and asks the model for company keywords and tone.
    pub async fn analyze(
        &self,
        url: &str,
        model: &dyn ModelClient,
    ) -> Result<CompanyAnalysis, CompanyAnalysisError> {
        let text = self.fetch_visible_text(url).await?;
        let excerpt = truncate_chars(&text, MAX_WEBSITE_CHARS);
        debug!(
            "Company page {url}: {} chars extracted, {} sent",
            text.chars().count(),
            excerpt.chars().count()
        );

        let prompt = fill_template(
            COMPANY_PROMPT_TEMPLATE,
            &[
                ("untrusted_input", UNTRUSTED_INPUT_INSTRUCTION),
                ("website_text", excerpt),
            ],
        );
        let analysis =
            call_json(model, COMPANY_SYSTEM, &prompt, Some(COMPANY_TEMPERATURE)).await?;
        Ok(analysis)
    }

    async fn fetch_visible_text(&self, url: &str) -> Result<String, CompanyAnalysisError> {
        let fetch_err = |source| CompanyAnalysisError::Fetch {
            url: url.to_string(),
            source,
        };

        let html = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?
            .text()
            .await
            .map_err(fetch_err)?;

        let text = extract_visible_text(&html);
        if text.is_empty() {
            return Err(CompanyAnalysisError::EmptyContent(url.to_string()));
        }
        Ok(text)
    }
}

/// Visible page text: one trimmed chunk per line, double-space runs split,
/// empty chunks dropped. Text under script/style-like elements is skipped.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut chunks: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        chunks.extend(
            text.lines()
                .flat_map(|line| line.trim().split("  "))
                .map(str::trim)
                .filter(|chunk| !chunk.is_empty()),
        );
    }

    chunks.join("\n")
}

/// Returns the first `max_chars` characters of `text`, on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{closed_local_url, local_analyzer};
    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use axum::{response::Html as HtmlResponse, routing::get, Router};

    const TESTCO_HTML: &str = r#"
        <html>
            <head><title>TestCo</title><style>body { color: red; }</style></head>
            <body>
                <h1>Welcome to TestCo</h1>
                <script>window.track("visit");</script>
                <p>We are an innovative company focused on AI and machine learning solutions.</p>
                <p>We use Python, TensorFlow, and React.</p>
            </body>
        </html>
    "#;

    /// Serves `html` at `/` on an ephemeral local port.
    async fn serve_html(html: &'static str) -> String {
        let app = Router::new().route("/", get(move || async move { HtmlResponse(html) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[test]
    fn test_visible_text_skips_script_and_style() {
        let text = extract_visible_text(TESTCO_HTML);
        assert!(text.contains("Welcome to TestCo"));
        assert!(text.contains("We use Python, TensorFlow, and React."));
        assert!(!text.contains("window.track"));
        assert!(!text.contains("color: red"));
        assert!(text.lines().all(|line| !line.trim().is_empty()));
    }

    #[test]
    fn test_visible_text_splits_double_spaces() {
        let text = extract_visible_text("<p>Mission  Vision</p>");
        assert_eq!(text, "Mission\nVision");
    }

    #[test]
    fn test_visible_text_empty_page() {
        assert_eq!(extract_visible_text("<html><body>  </body></html>"), "");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        let long = "x".repeat(MAX_WEBSITE_CHARS + 50);
        assert_eq!(truncate_chars(&long, MAX_WEBSITE_CHARS).len(), MAX_WEBSITE_CHARS);
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let url = serve_html(TESTCO_HTML).await;
        let model = ScriptedModel::new().respond(
            COMPANY_SYSTEM,
            r#"{"company_keywords": ["AI", "machine learning", "Python"],
                "company_tone": "Innovative and professional"}"#,
        );

        let analysis = local_analyzer().analyze(&url, &model).await.unwrap();

        assert!(analysis.company_keywords.contains(&"AI".to_string()));
        assert_eq!(analysis.company_tone, "Innovative and professional");
        assert_eq!(model.calls_for(COMPANY_SYSTEM), 1);
        assert!(model.prompts_for(COMPANY_SYSTEM)[0].contains("innovative company"));
    }

    #[tokio::test]
    async fn test_refused_connection_is_fetch_error() {
        let url = closed_local_url().await;
        let model = ScriptedModel::new();
        let err = local_analyzer().analyze(&url, &model).await.unwrap_err();
        match &err {
            CompanyAnalysisError::Fetch { source, .. } => assert!(!source.is_builder()),
            other => panic!("expected Fetch, got {other:?}"),
        }
        assert_eq!(model.calls_for(COMPANY_SYSTEM), 0);
    }

    #[tokio::test]
    async fn test_malformed_url_is_fetch_error() {
        let model = ScriptedModel::new();
        let err = local_analyzer()
            .analyze("not a url", &model)
            .await
            .unwrap_err();
        assert!(matches!(err, CompanyAnalysisError::Fetch { .. }), "got {err:?}");
        assert_eq!(model.calls_for(COMPANY_SYSTEM), 0);
    }

    #[tokio::test]
    async fn test_blank_page_is_empty_content() {
        let url = serve_html("<html><body><script>1</script></body></html>").await;
        let model = ScriptedModel::new();
        let err = local_analyzer().analyze(&url, &model).await.unwrap_err();
        assert!(matches!(err, CompanyAnalysisError::EmptyContent(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_model_failure_is_model_error() {
        let url = serve_html(TESTCO_HTML).await;
        let model = ScriptedModel::new().fail(COMPANY_SYSTEM, 500);
        let err = local_analyzer().analyze(&url, &model).await.unwrap_err();
        assert!(matches!(err, CompanyAnalysisError::Model(_)), "got {err:?}");
    }
}
