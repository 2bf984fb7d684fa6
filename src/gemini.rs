use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

// ── Constants ────────────────────────────────────────────────────────────────

const USER_AGENT: &str = "math-tutor-api/1.0";
const API_KEY_HEADER: &str = "x-goog-api-key";
const ERROR_BODY_PREVIEW: usize = 300;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("{0}")]
    Request(String),
    #[error("{status}: {message}")]
    Api { status: String, message: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("prompt was blocked: {0}")]
    Blocked(String),
    #[error("response contained no text (finish reason: {0})")]
    Empty(String),
}

// ── Request wire types ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

/// Base64 payload carried inline with the request.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

// ── Response wire types ──────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Non-text parts (function calls, inline media) deserialize with `text: None`.
#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, all text parts joined.
    pub fn text(&self) -> Result<String, GeminiError> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(GeminiError::Blocked(reason.to_string()));
        }

        let candidate = self
            .candidates
            .first()
            .ok_or_else(|| GeminiError::Empty("no candidates".to_string()))?;

        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.is_empty() {
            let reason = candidate
                .finish_reason
                .clone()
                .unwrap_or_else(|| "unknown".to_string());
            return Err(GeminiError::Empty(reason));
        }
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    status: Option<String>,
}

// ── Model seam ───────────────────────────────────────────────────────────────

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError>;
}

// ── HTTP client ──────────────────────────────────────────────────────────────

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    api_base: Url,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, api_base: Url) -> Result<Self, GeminiError> {
        // No overall timeout: generation runs until the service answers.
        let http = reqwest::ClientBuilder::new()
            .connect_timeout(std::time::Duration::from_secs(5))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GeminiError::Request(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            api_base,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!(
            "{}/models/{}:generateContent",
            self.api_base.as_str().trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = self.endpoint(model);
        tracing::debug!(%url, "calling generateContent");

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeminiError::Request(format!("TimeoutError: {}", e))
                } else if e.is_connect() {
                    GeminiError::Request(format!("ConnectError: {}", e))
                } else {
                    GeminiError::Request(format!("RequestError: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GeminiError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| GeminiError::Decode(e.to_string()))
    }
}

fn api_error(status: reqwest::StatusCode, body: &str) -> GeminiError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => GeminiError::Api {
            status: envelope
                .error
                .status
                .unwrap_or_else(|| status.as_u16().to_string()),
            message: envelope.error.message,
        },
        Err(_) => GeminiError::Api {
            status: status.to_string(),
            message: body.chars().take(ERROR_BODY_PREVIEW).collect(),
        },
    }
}
