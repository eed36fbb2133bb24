//! Inference provider abstractions.
//!
//! The `InferenceProvider` trait is the port the infrastructure layer
//! implements for the hosted model; `ProviderFactory` builds one from a
//! per-invocation credential.

pub mod provider;
pub mod retry;
