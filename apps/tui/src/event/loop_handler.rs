use color_eyre::Result;
use crossterm::event::{self, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;

use crate::ui;
use imagegen_tui::app::{handle_input, handle_paste, App};
use imagegen_tui::generation::{GenerationOrchestrator, Phase, RequestState};

/// Generate once for `prompt` without a UI and print the settled state.
pub async fn run_headless(
    orchestrator: &mut GenerationOrchestrator,
    prompt: &str,
    json: bool,
) -> Result<Phase> {
    if prompt.trim().is_empty() {
        return Err(color_eyre::eyre::eyre!("Prompt is empty"));
    }

    orchestrator.submit(prompt).await;
    let state = orchestrator.state();

    if json {
        render_headless_json(state)?;
    } else {
        render_headless_text(state);
    }

    Ok(state.phase())
}

fn render_headless_text(state: &RequestState) {
    if state.shows_error() {
        eprintln!("Error: {}", state.error);
        if !state.refined_prompt.is_empty() {
            eprintln!("{}", state.refined_prompt);
        }
        return;
    }

    println!("\nRefined Prompt");
    println!("==============");
    println!("{}", state.refined_prompt);

    if !state.image.is_empty() {
        println!("\nGenerated Image");
        println!("===============");
        println!("{}", state.image);
    }
}

fn render_headless_json(state: &RequestState) -> Result<()> {
    let result = HeadlessResult {
        phase: state.phase().to_string(),
        refined_prompt: &state.refined_prompt,
        image: &state.image,
        error: &state.error,
    };
    let json = serde_json::to_string_pretty(&result)?;
    println!("{json}");
    Ok(())
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct HeadlessResult<'a> {
    phase: String,
    refined_prompt: &'a str,
    image: &'a str,
    error: &'a str,
}

/// Run the main application event loop
pub fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    loop {
        // Apply finished exchanges before drawing so a settled request never
        // shows a stale spinner.
        app.poll_settlements();
        app.poll_downloads();
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    handle_input(app, key);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Paste(text)) => handle_paste(app, &text),
                Ok(Event::Resize(_, _)) => {
                    // Non-fatal redraw error
                    let _ = terminal.draw(|f| ui::ui(app, f));
                }
                Ok(Event::Mouse(_) | Event::FocusGained | Event::FocusLost) | Err(_) => {}
            }
        }
    }
    Ok(())
}
