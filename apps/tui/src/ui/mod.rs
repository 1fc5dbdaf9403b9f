// UI module for imagegen_tui
// Handles all UI rendering functions

pub mod screens;
pub mod widgets;

use imagegen_tui::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    screens::main::render_main(app, f);
}
