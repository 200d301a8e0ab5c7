use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{GenerationParams, Settings};
use crate::error::ChatError;
use crate::gateway::{ChatGateway, GatewayFuture};
use crate::model::{Role, Turn};
use crate::providers::http_errors::request_error;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Gemini `generateContent` backend.
///
/// The remote surface is stateless: every call replays the full transcript,
/// so all conversation state stays with the caller. The API key is wrapped
/// in [`SecretString`] and only exposed when building the auth header.
pub struct GeminiGateway {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    generation: GenerationParams,
}

impl GeminiGateway {
    pub fn new(settings: &Settings) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|err| {
                ChatError::Initialization(format!("failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            client,
            api_key: SecretString::from(settings.api_key.expose_secret().to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: settings.model_name.clone(),
            generation: settings.generation,
        })
    }

    /// Override the base URL (useful for testing or proxies).
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate(&self, turns: &[Turn]) -> Result<String, ChatError> {
        let api_url = self.generate_url();
        let body = GenerateContentRequest {
            contents: to_wire_contents(turns),
            generation_config: WireGenerationConfig::from(self.generation),
        };
        debug!(
            model = %self.model,
            turn_count = turns.len(),
            "sending generate request"
        );

        let response = self
            .client
            .post(&api_url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                warn!(model = %self.model, error = %err, "gemini request failed");
                request_error(err, &api_url, REQUEST_TIMEOUT_SECS)
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(response.headers());
            warn!(model = %self.model, ?retry_after, "gemini rate limit hit");
            return Err(ChatError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let response_body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read response body>".to_string());
            let message = api_error_message(&response_body);
            warn!(
                model = %self.model,
                status = %status,
                "gemini returned non-success status"
            );
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            ChatError::Transport(format!("Failed to parse Gemini response: {err}"))
        })?;
        let text = response_text(parsed)?;
        debug!(model = %self.model, response_len = text.len(), "received generate response");
        Ok(text)
    }
}

impl ChatGateway for GeminiGateway {
    fn send<'a>(&'a self, turns: &'a [Turn]) -> GatewayFuture<'a> {
        Box::pin(self.generate(turns))
    }
}

// The transcript role names differ from the wire protocol, which calls the
// assistant side "model".
fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

fn to_wire_contents(turns: &[Turn]) -> Vec<WireContent> {
    turns
        .iter()
        .map(|turn| WireContent {
            role: wire_role(turn.role),
            parts: vec![WirePart {
                text: turn.content.clone(),
            }],
        })
        .collect()
}

fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<WireErrorBody>(body)
        .map(|wire| wire.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn response_text(response: GenerateContentResponse) -> Result<String, ChatError> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ChatError::EmptyResponse);
    }
    Ok(text)
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    #[serde(rename = "generationConfig")]
    generation_config: WireGenerationConfig,
}

#[derive(Debug, Serialize)]
struct WireContent {
    role: &'static str,
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
struct WirePart {
    text: String,
}

#[derive(Debug, Serialize)]
struct WireGenerationConfig {
    temperature: f64,
    #[serde(rename = "topP")]
    top_p: f64,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

impl From<GenerationParams> for WireGenerationConfig {
    fn from(params: GenerationParams) -> Self {
        Self {
            temperature: params.temperature,
            top_p: params.top_p,
            top_k: params.top_k,
            max_output_tokens: params.max_output_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
struct WireCandidate {
    content: Option<WireCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct WireCandidateContent {
    #[serde(default)]
    parts: Vec<WireCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct WireCandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    error: WireErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WireErrorDetail {
    message: String,
}
