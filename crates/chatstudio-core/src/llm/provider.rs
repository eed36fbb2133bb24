//! InferenceProvider and ProviderFactory trait definitions.

use chatstudio_types::llm::{InferenceRequest, InferenceResponse, LlmError};

/// Trait for hosted inference backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in chatstudio-infra (e.g., `OpenAiResponsesProvider`).
pub trait InferenceProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send one request and wait for the full reply.
    fn respond(
        &self,
        request: &InferenceRequest,
    ) -> impl std::future::Future<Output = Result<InferenceResponse, LlmError>> + Send;
}

/// Builds a provider from a credential supplied for a single turn.
///
/// The credential is an input of each invocation rather than process-wide
/// state, so the turn controller asks for a fresh provider per send.
pub trait ProviderFactory: Send + Sync {
    type Provider: InferenceProvider;

    fn build(&self, api_key: &str) -> Result<Self::Provider, LlmError>;
}
