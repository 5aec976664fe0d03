//! Biometric prompt screen

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::ui::components::status_bar::render_status;
use crate::ui::layout::centered_rect_fixed;

/// Draw the biometric prompt, with an "Enter pin" tile when PIN is also accepted
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let offer_pin = app.lock.policy().allows_pin();

    let height = if offer_pin { 13 } else { 9 };
    let dialog = centered_rect_fixed(36, height, area);

    let block = Block::default()
        .title(" Locked ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let mut constraints = vec![
        Constraint::Length(1), // Spacer
        Constraint::Length(3), // Tap tile
        Constraint::Length(1), // Status
    ];
    if offer_pin {
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(3)); // PIN tile
    }
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .constraints(constraints)
        .split(inner);

    let scanning = app.lock.biometric_in_flight();
    let tap_label = if scanning { "Scanning..." } else { "Tap to unlock" };
    let tap = Paragraph::new(tap_label)
        .style(theme.text_highlight())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_focused()),
        );
    frame.render_widget(tap, chunks[1]);

    render_status(
        frame,
        chunks[2],
        app.status_message.as_deref().filter(|_| !scanning),
        false,
        theme,
    );

    if offer_pin {
        let pin = Paragraph::new("Enter pin")
            .style(theme.text())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(theme.border()));
        frame.render_widget(pin, chunks[4]);
    }
}
