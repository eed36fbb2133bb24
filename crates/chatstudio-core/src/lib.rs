//! Business logic and repository trait definitions for Chatbot Studio.
//!
//! This crate defines the "ports" (repository and provider traits) that the
//! infrastructure layer implements, plus the store service, the redactor and
//! the turn controller. It depends only on `chatstudio-types` -- never on
//! `chatstudio-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod redact;
pub mod repository;
pub mod service;
