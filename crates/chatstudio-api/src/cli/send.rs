//! `cstudio send`: run one turn from the command line.

use anyhow::Result;
use clap::Args;
use console::style;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::{ExposeSecret, SecretString};

use chatstudio_infra::secret::resolve_api_key;
use chatstudio_types::chat::{TurnRequest, TurnStatus};
use chatstudio_types::llm::ReasoningEffort;

use crate::cli::{parse_effort, parse_temperature};
use crate::state::AppState;

#[derive(Args)]
pub struct SendArgs {
    /// Session id.
    #[arg(long)]
    pub session: i64,

    /// System-role text recorded before the prompt.
    #[arg(long)]
    pub system: Option<String>,

    /// User prompt (prompted if omitted).
    #[arg(long)]
    pub prompt: Option<String>,

    /// Model identifier (defaults to config.toml, then gpt-5).
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature in [0, 1].
    #[arg(long, value_parser = parse_temperature)]
    pub temperature: Option<f64>,

    /// Reasoning effort: low, medium, high.
    #[arg(long, value_parser = parse_effort)]
    pub effort: Option<ReasoningEffort>,

    /// Store and send the prompt without redacting emails/phone numbers.
    #[arg(long)]
    pub no_anonymize: bool,

    /// Store the prompt without calling the model.
    #[arg(long)]
    pub save_only: bool,

    /// API key for this invocation (falls back to OPENAI_API_KEY).
    #[arg(long, conflicts_with = "ask_key")]
    pub api_key: Option<String>,

    /// Prompt for the API key with hidden input.
    #[arg(long)]
    pub ask_key: bool,
}

/// Run one turn and print what was recorded.
///
/// # Examples
///
/// ```bash
/// cstudio send --session 3 --system "Be brief." --prompt "Hi, I'm ana@x.com"
/// cstudio send --session 3 --prompt "draft" --save-only
/// ```
pub async fn send(state: &AppState, args: SendArgs, json: bool) -> Result<()> {
    // Fail on an unknown session before any prompt.
    let session = state.store.get_session(args.session).await?;

    let prompt = match args.prompt {
        Some(p) => p,
        None => Input::<String>::new()
            .with_prompt("Prompt")
            .allow_empty(true)
            .interact_text()?,
    };

    let request = TurnRequest {
        system: args.system,
        prompt,
        model: args.model.unwrap_or_else(|| state.config.model.clone()),
        temperature: args.temperature.unwrap_or(state.config.temperature),
        reasoning_effort: args.effort.unwrap_or(state.config.reasoning_effort),
        anonymize: state.config.anonymize && !args.no_anonymize,
        save_only: args.save_only,
    };

    let api_key = if request.save_only {
        None
    } else {
        resolve_key(state, args.api_key.as_deref(), args.ask_key)?
    };

    let spinner = if request.save_only || json {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        spinner.set_message(format!("Waiting for {}...", request.model));
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Some(spinner)
    };

    let result = state
        .turns
        .run_turn(
            session.id,
            &request,
            api_key.as_ref().map(|k| k.expose_secret()),
        )
        .await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let outcome = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!();
    if let Some(system) = &outcome.system_message {
        println!("  {} {}", style("system").yellow().bold(), system.content);
    }
    println!(
        "  {}   {}",
        style("user").cyan().bold(),
        outcome.user_message.content
    );

    match (&outcome.status, &outcome.assistant_message) {
        (TurnStatus::Sent, Some(reply)) => {
            println!();
            println!("  {}", style("assistant").green().bold());
            for line in reply.content.lines() {
                println!("  {line}");
            }
            if let Some(latency) = reply.metadata.get("latency_ms") {
                println!();
                println!("  {}", style(format!("{} · {latency} ms", request.model)).dim());
            }
        }
        _ => {
            println!();
            println!(
                "  {} Saved without sending.",
                style("i").blue().bold()
            );
        }
    }
    println!();

    Ok(())
}

/// Resolve the credential: `--api-key`, hidden prompt, `OPENAI_API_KEY`,
/// then a hidden prompt when a terminal is attached.
fn resolve_key(
    state: &AppState,
    explicit: Option<&str>,
    ask: bool,
) -> Result<Option<SecretString>> {
    if ask {
        return Ok(Some(prompt_for_key()?));
    }

    match resolve_api_key(explicit, &state.credentials) {
        Some(key) => Ok(Some(key)),
        None if console::user_attended() => Ok(Some(prompt_for_key()?)),
        None => Ok(None),
    }
}

fn prompt_for_key() -> Result<SecretString> {
    let key = Password::new()
        .with_prompt(format!("Enter value for {}", style("OPENAI_API_KEY").bold()))
        .allow_empty_password(true)
        .interact()?;
    Ok(SecretString::from(key))
}
