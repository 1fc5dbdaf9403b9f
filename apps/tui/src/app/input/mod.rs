mod help;
mod prompt;

use crate::app::state::App;
use crossterm::event::{KeyEvent, KeyEventKind};

pub fn handle_input(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    if help::handle_help_toggle(app, key.code) {
        return;
    }

    prompt::handle_prompt_input(app, key);
}

/// Bracketed paste lands in the prompt as typed text.
pub fn handle_paste(app: &mut App, text: &str) {
    if app.show_help {
        return;
    }
    app.prompt.insert_str(text);
}
