//! Studio configuration types.
//!
//! `StudioConfig` represents the optional `config.toml` in the data
//! directory. It only supplies defaults: every value can be overridden per
//! invocation, and credentials are never read from it.

use serde::{Deserialize, Serialize};

use crate::llm::ReasoningEffort;

/// Defaults for turn parameters and the inference client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Model identifier sent to the inference service.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature in [0, 1].
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default)]
    pub reasoning_effort: ReasoningEffort,

    /// Redact emails/phones from prompts unless told otherwise.
    #[serde(default = "default_anonymize")]
    pub anonymize: bool,

    /// Base URL of the Responses API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout for the inference call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Extra attempts for transient inference failures (0 = no retry).
    #[serde(default)]
    pub max_retries: u32,

    /// Linear backoff step between retries.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_model() -> String {
    "gpt-5".to_string()
}

fn default_temperature() -> f64 {
    0.2
}

fn default_anonymize() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            reasoning_effort: ReasoningEffort::default(),
            anonymize: default_anonymize(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}
