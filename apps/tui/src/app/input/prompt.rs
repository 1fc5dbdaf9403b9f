use crate::app::state::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_prompt_input(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        handle_control_key(app, key.code);
        return;
    }

    match key.code {
        KeyCode::Esc => app.quit(),
        // Disabled submit: a blank prompt or a request in flight is ignored.
        KeyCode::Enter => {
            app.submit();
        }
        KeyCode::Backspace => app.prompt.backspace(),
        KeyCode::Char(c) => app.prompt.insert(c),
        _ => {}
    }
}

fn handle_control_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('c' | 'q') => app.quit(),
        KeyCode::Char('r') => {
            app.retry();
        }
        // Runs in the background; the result shows up in the status line.
        KeyCode::Char('s') => {
            app.download_image();
        }
        KeyCode::Char('u') => app.prompt.clear(),
        _ => {}
    }
}
