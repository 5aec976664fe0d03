//! The wrapped content shown once unlocked

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::ui::components::status_bar::{render_help_footer, render_status};
use crate::ui::layout::{body_and_footer, centered_rect};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let (body, footer) = body_and_footer(area);

    let block = Block::default()
        .title(" lockview ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border());
    let inner = block.inner(body);
    frame.render_widget(block, body);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status
            Constraint::Length(1), // Lock policy
        ])
        .split(inner);

    let text = Paragraph::new(app.content.as_str())
        .style(theme.text())
        .alignment(Alignment::Center);
    frame.render_widget(text, centered_rect(80, 20, chunks[0]));

    render_status(frame, chunks[1], app.status_message.as_deref(), false, theme);

    let policy = if app.lock.is_enabled() {
        format!("Lock: {}", app.lock.policy().description())
    } else {
        "Lock: off".to_string()
    };
    let policy = Paragraph::new(policy)
        .style(theme.text_muted())
        .alignment(Alignment::Center);
    frame.render_widget(policy, chunks[2]);

    let lock_hint = if app.lock.is_enabled() {
        "Disable lock"
    } else {
        "Enable lock"
    };
    render_help_footer(
        frame,
        footer,
        &[("b", "Background"), ("e", lock_hint), ("q", "Quit")],
        theme,
    );
}
