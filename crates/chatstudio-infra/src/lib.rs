//! Infrastructure layer for Chatbot Studio.
//!
//! Contains implementations of the ports defined in `chatstudio-core`:
//! SQLite storage, the OpenAI Responses inference provider, credential
//! resolution, and configuration loading.

pub mod config;
pub mod llm;
pub mod secret;
pub mod sqlite;
