//! Repository trait definitions (ports) for persistence.

pub mod project;
