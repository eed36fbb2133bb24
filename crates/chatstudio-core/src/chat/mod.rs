//! Conversation persistence, turn orchestration and export.
//!
//! `ChatRepository` is the port for sessions and the message log,
//! `TurnController` runs one user submission end to end, and `export`
//! renders a session's history as JSON lines.

pub mod export;
pub mod repository;
pub mod turn;
