//! OpenAiResponsesProvider -- concrete [`InferenceProvider`] for the OpenAI
//! Responses API (`POST /responses`).
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the `Authorization` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use chatstudio_core::llm::provider::{InferenceProvider, ProviderFactory};
use chatstudio_types::llm::{InferenceRequest, InferenceResponse, LlmError};

use super::types::{ErrorEnvelope, ReasoningConfig, ResponsesRequest, ResponsesResponse};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI Responses API provider.
pub struct OpenAiResponsesProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl OpenAiResponsesProvider {
    /// Create a provider with the given credential and request timeout.
    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn to_responses_request(request: &InferenceRequest) -> ResponsesRequest {
        ResponsesRequest {
            model: request.model.clone(),
            input: request.input.clone(),
            temperature: request.temperature,
            reasoning: ReasoningConfig {
                effort: request.reasoning_effort.to_string(),
            },
        }
    }
}

// No Debug derive: keeps the credential-bearing struct out of log output.

impl InferenceProvider for OpenAiResponsesProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn respond(&self, request: &InferenceRequest) -> Result<InferenceResponse, LlmError> {
        let body = Self::to_responses_request(request);
        let url = self.url("/responses");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = retry_after_ms(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&error_body)
                .map(|env| env.error.message)
                .unwrap_or(error_body);

            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                400 | 404 | 422 => LlmError::InvalidRequest(message),
                429 => LlmError::RateLimited { retry_after_ms },
                500..=599 => LlmError::Overloaded(format!("HTTP {status}: {message}")),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {message}"),
                },
            });
        }

        let parsed: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let output_text = parsed
            .text()
            .ok_or_else(|| LlmError::Deserialization("response contained no output text".into()))?;

        Ok(InferenceResponse { output_text })
    }
}

/// Longest server-requested wait honoured before a retry.
const MAX_RETRY_AFTER_MS: u64 = 60_000;

/// Parse a `retry-after` header given in whole seconds, capped at
/// [`MAX_RETRY_AFTER_MS`].
fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    let secs = headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()?;
    Some(secs.saturating_mul(1000).min(MAX_RETRY_AFTER_MS))
}

/// Builds an [`OpenAiResponsesProvider`] for each turn's credential.
#[derive(Debug, Clone)]
pub struct OpenAiProviderFactory {
    base_url: String,
    timeout: Duration,
}

impl OpenAiProviderFactory {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

impl ProviderFactory for OpenAiProviderFactory {
    type Provider = OpenAiResponsesProvider;

    fn build(&self, api_key: &str) -> Result<Self::Provider, LlmError> {
        let provider = OpenAiResponsesProvider::new(SecretString::from(api_key), self.timeout)?;
        Ok(provider.with_base_url(self.base_url.clone()))
    }
}
