//! Session CLI commands: create, list, history, export.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Input;

use chatstudio_core::chat::export::export_file_name;
use chatstudio_types::chat::MessageRole;

use crate::cli::truncate;
use crate::state::AppState;

/// Create a new session inside a project.
///
/// # Examples
///
/// ```bash
/// cstudio create session --project 1 --title "Refund flow"
/// ```
pub async fn create_session(
    state: &AppState,
    project_id: i64,
    title: Option<String>,
    json: bool,
) -> Result<()> {
    // Fail on an unknown project before prompting.
    let project = state.store.get_project(project_id).await?;

    let title = match title {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("Session title")
            .interact_text()?,
    };

    let session = state.store.create_session(project.id, &title).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Session {} created in '{}'",
        style("✓").green().bold(),
        style(session.id).bold(),
        style(&project.name).cyan()
    );
    println!();
    println!(
        "  Next: {}",
        style(format!("cstudio send --session {} --prompt \"...\"", session.id)).yellow()
    );
    println!();

    Ok(())
}

/// List sessions of a project.
pub async fn list_sessions(state: &AppState, project_id: i64, json: bool) -> Result<()> {
    let sessions = state.store.list_sessions(project_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions for project {}. Start one with: {}",
            style("i").blue().bold(),
            project_id,
            style(format!("cstudio create session --project {project_id}")).yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for session in &sessions {
        table.add_row(vec![
            Cell::new(session.id).fg(Color::DarkGrey),
            Cell::new(truncate(&session.title, 50)).fg(Color::Cyan),
            Cell::new(session.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!();
    println!("{table}");
    println!();

    Ok(())
}

/// Show a session's message log, oldest first.
pub async fn history(state: &AppState, session_id: i64, json: bool) -> Result<()> {
    let session = state.store.get_session(session_id).await?;
    let messages = state.store.get_messages(session.id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    println!();
    println!("  History for '{}'", style(&session.title).cyan().bold());
    println!();

    if messages.is_empty() {
        println!("  {} No messages yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Content").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for msg in &messages {
        let role_cell = match msg.role {
            MessageRole::System => Cell::new("system").fg(Color::Yellow),
            MessageRole::User => Cell::new("user").fg(Color::Cyan),
            MessageRole::Assistant => Cell::new("assistant").fg(Color::Green),
        };
        table.add_row(vec![
            Cell::new(msg.id).fg(Color::DarkGrey),
            role_cell,
            Cell::new(truncate(&msg.content, 80)),
            Cell::new(msg.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ]);
    }

    println!("{table}");
    println!();

    Ok(())
}

/// Export a session as JSON Lines to a file, or to stdout with `-`.
///
/// # Examples
///
/// ```bash
/// cstudio export --session 3                # writes session_3.jsonl
/// cstudio export --session 3 --output -     # prints to stdout
/// ```
pub async fn export_session(
    state: &AppState,
    session_id: i64,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let bytes = state.store.export_session(session_id).await?;

    let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(session_id)));
    if path.as_os_str() == "-" {
        println!("{}", String::from_utf8_lossy(&bytes));
        return Ok(());
    }

    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let lines = if bytes.is_empty() {
        0
    } else {
        bytes.iter().filter(|b| **b == b'\n').count() + 1
    };

    if json {
        println!(
            "{}",
            serde_json::json!({"session_id": session_id, "path": path, "lines": lines})
        );
    } else {
        println!(
            "  {} Exported {} message{} to {}",
            style("✓").green().bold(),
            lines,
            if lines == 1 { "" } else { "s" },
            style(path.display()).cyan()
        );
    }

    Ok(())
}
