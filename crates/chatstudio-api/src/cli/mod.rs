//! CLI command definitions and dispatch for the `cstudio` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `cstudio create project`, `cstudio list sessions`).

pub mod project;
pub mod send;
pub mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use chatstudio_types::llm::ReasoningEffort;

/// Prototype chatbots: projects, sessions, and a redacting chat log.
#[derive(Parser)]
#[command(name = "cstudio", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new resource.
    Create {
        #[command(subcommand)]
        resource: CreateResource,
    },

    /// List resources.
    #[command(alias = "ls")]
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Submit one turn to a session (optionally calling the model).
    Send(send::SendArgs),

    /// Show the message history of a session.
    History {
        /// Session id.
        #[arg(long)]
        session: i64,
    },

    /// Export a session as JSON Lines.
    Export {
        /// Session id.
        #[arg(long)]
        session: i64,

        /// Output file (defaults to session_{id}.jsonl; "-" writes to stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CreateResource {
    /// Create a new project.
    Project {
        /// Project name (prompted if omitted).
        #[arg(long)]
        name: Option<String>,

        /// Optional description.
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Create a new session inside a project.
    Session {
        /// Project id.
        #[arg(long)]
        project: i64,

        /// Session title (prompted if omitted).
        #[arg(long)]
        title: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// List all projects.
    Projects,

    /// List sessions of a project.
    Sessions {
        /// Project id.
        #[arg(long)]
        project: i64,
    },
}

/// Parse a reasoning effort flag value.
pub fn parse_effort(s: &str) -> Result<ReasoningEffort, String> {
    s.parse()
}

/// Parse and range-check a temperature flag value.
pub fn parse_temperature(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("temperature must be within [0, 1], got {value}"))
    }
}

/// Shorten text for single-line table cells.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > max_chars {
        let cut: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
