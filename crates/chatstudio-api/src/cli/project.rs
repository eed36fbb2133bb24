//! Project CLI commands: create, list.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Input;

use crate::cli::truncate;
use crate::state::AppState;

/// Create a new project.
///
/// # Examples
///
/// ```bash
/// cstudio create project --name "Support bot" --description "FAQ answers"
/// ```
pub async fn create_project(
    state: &AppState,
    name: Option<String>,
    description: &str,
    json: bool,
) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new()
            .with_prompt("Project name")
            .interact_text()?,
    };

    let project = state.store.create_project(&name, description).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&project)?);
        return Ok(());
    }

    println!();
    println!("  {} Project created", style("✓").green().bold());
    println!();
    println!("  {}    {}", style("ID:").bold(), project.id);
    println!("  {}  {}", style("Name:").bold(), style(&project.name).cyan());
    if !project.description.is_empty() {
        println!("  {}  {}", style("Desc:").bold(), project.description);
    }
    println!();
    println!(
        "  Next: {}",
        style(format!("cstudio create session --project {}", project.id)).yellow()
    );
    println!();

    Ok(())
}

/// List all projects in creation order.
pub async fn list_projects(state: &AppState, json: bool) -> Result<()> {
    let projects = state.store.list_projects().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!();
        println!(
            "  {} No projects yet. Create one with: {}",
            style("i").blue().bold(),
            style("cstudio create project --name <NAME>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Description").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for project in &projects {
        table.add_row(vec![
            Cell::new(project.id).fg(Color::DarkGrey),
            Cell::new(&project.name).fg(Color::Cyan),
            Cell::new(truncate(&project.description, 50)),
            Cell::new(project.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} project{}",
        style(projects.len()).bold(),
        if projects.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
