//! OpenAI Responses API provider.
//!
//! Provides [`OpenAiResponsesProvider`], the [`InferenceProvider`] used for
//! assistant replies, and [`OpenAiProviderFactory`], which builds one per
//! turn from that turn's credential.
//!
//! [`InferenceProvider`]: chatstudio_core::llm::provider::InferenceProvider

pub mod client;
pub mod types;

pub use client::{DEFAULT_BASE_URL, OpenAiProviderFactory, OpenAiResponsesProvider};
