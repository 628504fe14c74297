//! Gemini provider implementation
//!
//! Talks to the `generateContent` REST endpoint with a blocking client;
//! callers run it on a blocking thread. Each provider instance is bound to
//! one model, the chain in [`crate::chain`] handles fallback between them.
//!
//! # Examples
//!
//! ```no_run
//! use verity_reasoner::{GeminiProvider, ReasonerConfig};
//!
//! let config = ReasonerConfig::default();
//! let provider = GeminiProvider::new(&config, "gemini-2.0-flash", "api-key").unwrap();
//! ```

use crate::config::ReasonerConfig;
use crate::error::LlmError;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;
use verity_domain::traits::LlmProvider;

/// Gemini API provider for a single model
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    generation_config: GenerationConfig,
    client: Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: &'a GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

impl GeminiProvider {
    /// Create a provider for `model` using the endpoint and sampling settings in `config`
    pub fn new(
        config: &ReasonerConfig,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            generation_config: GenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
                top_k: config.top_k,
                max_output_tokens: config.max_output_tokens,
            },
            client,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl LlmProvider for GeminiProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: &self.generation_config,
        };

        debug!(model = %self.model, "Sending generateContent request");
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_status(status, &self.model, error_text));
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
        extract_text(parsed)
    }
}

fn classify_status(status: StatusCode, model: &str, body: String) -> LlmError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            LlmError::RateLimitExceeded(format!("{}: {}", model, body))
        }
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LlmError::Config(format!("HTTP {}: {}", status, body))
        }
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, LlmError> {
    let block_reason = response
        .prompt_feedback
        .and_then(|f| f.block_reason)
        .unwrap_or_else(|| "no candidates".to_string());

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::ContentBlocked(block_reason))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(LlmError::ContentBlocked(
            candidate
                .finish_reason
                .unwrap_or_else(|| "empty content".to_string()),
        ));
    }
    Ok(text)
}
