//! Inference provider implementations.

pub mod openai;
