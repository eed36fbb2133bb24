//! Observability setup for Chatbot Studio: structured logging with an
//! optional OpenTelemetry bridge.

pub mod tracing_setup;
