//! HTTP/REST API layer for Chatbot Studio.
//!
//! Axum-based REST API at `/api/v1/` with the envelope response format and
//! CORS support. Intended for local use: there is no authentication.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
