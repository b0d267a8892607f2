//! Single-shot text completion against the Gemini `generateContent` API.
//!
//! One prompt in, one text blob out. No streaming and no retries: a failed
//! call surfaces to the caller, who may re-invoke by hand.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::credentials::Credentials;
use crate::errors::CompressError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Extraction, not creative writing: keep variance low.
pub const TEMPERATURE: f64 = 0.3;

const GENERIC_UPSTREAM_MESSAGE: &str = "Gemini API error";

/// A backend that turns one prompt into one completion.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Complete `prompt` with the key in 1-based slot `credential_index`.
    async fn complete(
        &self,
        prompt: &str,
        max_output_tokens: u32,
        credential_index: usize,
    ) -> Result<String, CompressError>;
}

#[async_trait]
impl<T: CompletionBackend + ?Sized> CompletionBackend for Arc<T> {
    async fn complete(
        &self,
        prompt: &str,
        max_output_tokens: u32,
        credential_index: usize,
    ) -> Result<String, CompressError> {
        (**self)
            .complete(prompt, max_output_tokens, credential_index)
            .await
    }
}

// ── Wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.is_empty())
    }
}

/// Pull `error.message` out of an error body, if it has one.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.error)
        .and_then(|err| err.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_UPSTREAM_MESSAGE.to_string())
}

// ── Client ────────────────────────────────────────────────────────────

/// Settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// HTTP client for the generative-language endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    settings: GeminiSettings,
    credentials: Credentials,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings, credentials: Credentials) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self {
            http,
            settings,
            credentials,
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }
}

#[async_trait]
impl CompletionBackend for GeminiClient {
    async fn complete(
        &self,
        prompt: &str,
        max_output_tokens: u32,
        credential_index: usize,
    ) -> Result<String, CompressError> {
        let key = self.credentials.resolve(credential_index)?;

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens,
            },
        };

        debug!(
            model = %self.settings.model,
            server = credential_index,
            max_output_tokens,
            prompt_chars = prompt.len(),
            "Sending generateContent request"
        );

        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // reqwest includes the URL, and with it the key, in its Display
                let e = e.without_url();
                warn!(error = %e, "Completion request failed to send");
                CompressError::Upstream(format!("Failed to reach Gemini: {}", e))
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            CompressError::Upstream(format!("Failed to read Gemini response: {}", e.without_url()))
        })?;

        if !status.is_success() {
            let message = upstream_message(&text);
            warn!(status = %status, message = %message, "Gemini returned an error status");
            return Err(CompressError::Upstream(message));
        }

        // A success body that does not match the schema carries no usable text
        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            debug!(error = %e, "Gemini success body did not match the response schema");
            CompressError::EmptyResponse
        })?;

        let completion = parsed.first_text().ok_or(CompressError::EmptyResponse)?;
        debug!(completion_chars = completion.len(), "Received completion");
        Ok(completion)
    }
}
