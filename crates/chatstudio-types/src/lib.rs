//! Shared domain types for Chatbot Studio.
//!
//! This crate contains the core domain types used across the workspace:
//! Project, Session, Message, inference request/response shapes, the
//! studio configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod project;
