use crate::ui::widgets::popup::{centered_rect, render_popup};
use imagegen_tui::app::App;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};

const PLACEHOLDER: &str = "Enter your idea (e.g. cyberpunk samurai riding a dragon)";
const BUSY_LABEL: &str = "✨ Crafting the best output...";

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title area
            Constraint::Length(6), // Prompt input
            Constraint::Length(3), // Submit control
            Constraint::Min(6),    // Results
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(2, 1)));

    render_title_section(f, main_layout[0]);
    render_prompt_section(app, f, main_layout[1]);
    render_submit_control(app, f, main_layout[2]);
    render_results_section(app, f, main_layout[3]);
    render_status_section(app, f, main_layout[4]);
    render_shortcuts(f, main_layout[5]);

    if app.show_help {
        let area = f.area();
        render_help_popup(f, area);
    }
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn render_title_section(f: &mut Frame<'_>, area: Rect) {
    let title = Paragraph::new(TextLine::from(vec![
        Span::styled(
            "AI Image ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Generator",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(title, area);
}

fn render_prompt_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Your Idea ")
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let text = if app.prompt.value().is_empty() {
        TextLine::from(vec![
            Span::styled("_", Style::default().fg(Color::Green)),
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        TextLine::from(vec![
            Span::styled(app.prompt.value(), Style::default().fg(Color::White)),
            Span::styled("_", Style::default().fg(Color::Green)),
        ])
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_submit_control(app: &App, f: &mut Frame<'_>, area: Rect) {
    let label = if app.request().is_loading {
        "Generating..."
    } else {
        "Generate Image"
    };

    let style = if app.can_submit() {
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray).bg(Color::DarkGray)
    };

    let button = Paragraph::new(TextLine::from(Span::styled(format!("  {label}  "), style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE));

    let button_area = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    f.render_widget(button, button_area);
}

fn render_results_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let request = app.request();

    if request.is_loading {
        render_busy_indicator(app, f, area);
        return;
    }

    if request.shows_error() {
        render_error_panel(&request.error, f, area);
        return;
    }

    let panels = match (request.shows_refined_prompt(), request.shows_image()) {
        (true, true) => Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area)
            .to_vec(),
        (true, false) | (false, true) => vec![area],
        (false, false) => return,
    };

    let mut slots = panels.into_iter();
    if request.shows_refined_prompt() {
        if let Some(slot) = slots.next() {
            render_refined_prompt_panel(&request.refined_prompt, f, slot);
        }
    }
    if request.shows_image() {
        if let Some(slot) = slots.next() {
            render_image_panel(&request.image, f, slot);
        }
    }
}

fn render_busy_indicator(app: &App, f: &mut Frame<'_>, area: Rect) {
    let throbber = Throbber::default()
        .label(BUSY_LABEL)
        .style(Style::default().fg(Color::LightBlue))
        .throbber_style(
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);

    let width = u16::try_from(BUSY_LABEL.chars().count() + 2).unwrap_or(area.width);
    let spinner_area = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height / 2,
        width: width.min(area.width),
        height: 1,
    };

    let mut state = app.throbber_state.clone();
    f.render_stateful_widget(throbber, spinner_area, &mut state);
}

fn render_error_panel(error: &str, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Error ")
        .title_style(Style::default().fg(Color::Red))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let lines = vec![
        TextLine::from(Span::styled(error, Style::default().fg(Color::LightRed))),
        TextLine::from(""),
        TextLine::from(vec![
            Span::styled("Ctrl+R", key_style()),
            Span::styled(": Retry", Style::default().fg(Color::Gray)),
        ]),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_refined_prompt_panel(refined_prompt: &str, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Refined Prompt ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(refined_prompt)
        .style(Style::default().fg(Color::Gray))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_image_panel(image: &str, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Generated Image ")
        .title_style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let lines = vec![
        TextLine::from(Span::styled(
            describe_image(image),
            Style::default().fg(Color::White),
        )),
        TextLine::from(""),
        TextLine::from(vec![
            Span::styled("Ctrl+S", key_style()),
            Span::styled(": ⬇ Download Image", Style::default().fg(Color::LightBlue)),
        ]),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Data URIs are far too long to print; show the header and payload size.
fn describe_image(image: &str) -> String {
    if image.starts_with("data:") {
        if let Some((meta, payload)) = image.split_once(',') {
            return format!("{meta},… ({} chars)", payload.len());
        }
    }
    image.to_string()
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let color = if app.status_message.starts_with("Download failed") {
        Color::Red
    } else {
        Color::Green
    };

    let status = Paragraph::new(Span::styled(
        app.status_message.as_str(),
        Style::default().fg(color),
    ))
    .block(status_block);
    f.render_widget(status, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let hint = Style::default().fg(Color::Gray);
    let shortcuts = TextLine::from(vec![
        Span::styled("F1", key_style()),
        Span::styled(": Help | ", hint),
        Span::styled("Enter", key_style()),
        Span::styled(": Generate | ", hint),
        Span::styled("Ctrl+R", key_style()),
        Span::styled(": Retry | ", hint),
        Span::styled("Ctrl+S", key_style()),
        Span::styled(": Download | ", hint),
        Span::styled("Ctrl+U", key_style()),
        Span::styled(": Clear | ", hint),
        Span::styled("Esc", key_style()),
        Span::styled(": Quit", hint),
    ]);

    f.render_widget(
        Paragraph::new(shortcuts).alignment(Alignment::Center),
        area,
    );
}

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(80, 80, area);
    render_popup(
        f,
        popup_area,
        "== Help & Keyboard Shortcuts ==",
        Text::from(build_help_lines()),
    );

    let hint = Paragraph::new(Span::styled(
        "Press F1 or Esc to close",
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

fn help_entry(key: &'static str, description: &'static str) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(format!("  {key}"), key_style()),
        Span::raw(format!(" - {description}")),
    ])
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    let mut lines = vec![
        TextLine::from(Span::styled(
            "AI Image Generator",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(
            "Type an idea, press Enter, and the backend returns a refined prompt and an image.",
        ),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Keyboard Shortcuts:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        help_entry("F1", "Toggle this help popup"),
        help_entry("Enter", "Generate (disabled while empty or busy)"),
        help_entry("Ctrl+R", "Retry the last idea after an error"),
        help_entry("Ctrl+S", "Download the generated image"),
        help_entry("Ctrl+U", "Clear the idea"),
        help_entry("Esc / Ctrl+C", "Quit application"),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "CLI Options:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    let help_text = crate::cli::CliArgs::help_text();
    for line in help_text.lines() {
        if line.starts_with("Usage") || line.starts_with("Options") || line.trim().is_empty() {
            continue;
        }
        lines.push(TextLine::from(line.to_string()));
    }

    lines
}
