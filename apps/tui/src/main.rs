mod cli;
mod event;
mod terminal;
mod ui;

use std::io::Read;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use imagegen_tui::app::App;
use imagegen_tui::config::{debug_enabled, get_download_dir, get_log_file, init_app_config};
use imagegen_tui::generation::{GenerationOrchestrator, HttpGenerationClient, Phase};
use imagegen_tui::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = cli::CliArgs::parse();
    args.apply_env_overrides();
    init_app_config();
    init_logging(&get_log_file(), debug_enabled())?;

    let client = HttpGenerationClient::from_env();

    // One-shot mode: explicit prompt, or piped input when there is no terminal
    let headless_prompt = match prompt_source(
        args.prompt.clone(),
        is_terminal(),
        atty::is(atty::Stream::Stdin),
    ) {
        PromptSource::Flag(prompt) => Some(prompt),
        PromptSource::Stdin => {
            eprintln!("Reading prompt from stdin...");
            Some(read_stdin_prompt()?)
        }
        PromptSource::Missing => {
            return Err(color_eyre::eyre::eyre!(
                "stdout is not a terminal: pass --prompt or pipe the prompt on stdin"
            ));
        }
        PromptSource::Interactive => None,
    };

    if let Some(prompt) = headless_prompt {
        let mut orchestrator = GenerationOrchestrator::new(Arc::new(client));
        let phase = event::run_headless(&mut orchestrator, &prompt, args.json).await?;
        if phase == Phase::Failure {
            std::process::exit(1);
        }
        return Ok(());
    }

    let http = client.http().clone();
    let mut app = App::new(Arc::new(client), http, get_download_dir());
    tracing::info!("starting interactive session");

    // Setup terminal
    let mut terminal = terminal::setup()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app);

    // Restore terminal
    terminal::cleanup(true, true);

    result
}

#[derive(Debug, PartialEq, Eq)]
enum PromptSource {
    Flag(String),
    Stdin,
    /// Output is redirected but nothing is piped in.
    Missing,
    Interactive,
}

/// Stdin is only read when it is not a terminal.
fn prompt_source(prompt: Option<String>, stdout_tty: bool, stdin_tty: bool) -> PromptSource {
    match prompt {
        Some(prompt) => PromptSource::Flag(prompt),
        None if stdout_tty => PromptSource::Interactive,
        None if stdin_tty => PromptSource::Missing,
        None => PromptSource::Stdin,
    }
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn read_stdin_prompt() -> Result<String> {
    let mut prompt = String::new();
    std::io::stdin().read_to_string(&mut prompt)?;
    Ok(prompt.trim().to_string())
}
