//! PIN entry screen

use lockview_core::{AwaitingMethod, PIN_LENGTH};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::ui::components::status_bar::render_status;
use crate::ui::layout::{centered_rect_fixed, offset_x};

/// Width of one digit box including its border
const BOX_WIDTH: u16 = 5;

/// Draw the PIN entry screen
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let dialog = centered_rect_fixed(40, 12, area);
    let block = Block::default()
        .title(" Enter PIN ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Back hint
            Constraint::Length(1), // Spacer
            Constraint::Length(3), // PIN boxes
            Constraint::Length(1), // Error message
            Constraint::Min(0),    // Spacer
            Constraint::Length(1), // Forgot PIN
        ])
        .split(inner);

    if app.lock.show_back_to_biometric() {
        let back = Paragraph::new(Line::from(vec![
            Span::styled("← ", theme.text_highlight()),
            Span::styled("Use biometrics", theme.text_secondary()),
        ]));
        frame.render_widget(back, chunks[0]);
    } else if app.lock.session_flags().biometric_unavailable_observed
        || app.lock.awaiting_method() == Some(AwaitingMethod::PinEntryNoBiometricHint)
    {
        let hint = Paragraph::new("Biometrics unavailable")
            .style(theme.text_muted())
            .alignment(Alignment::Center);
        frame.render_widget(hint, chunks[0]);
    }

    draw_boxes(frame, chunks[2], app);

    let error = app.shake.is_active().then_some("Wrong PIN");
    render_status(frame, chunks[3], error, true, theme);

    let forgot = Paragraph::new("Forgot PIN?")
        .style(theme.text_highlight())
        .alignment(Alignment::Center);
    frame.render_widget(forgot, chunks[5]);
}

/// One box per digit position, echoing the typed digit
fn draw_boxes(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let shaking = app.shake.is_active();

    let width = BOX_WIDTH * PIN_LENGTH as u16 + (PIN_LENGTH as u16 - 1);
    let row = centered_rect_fixed(width, 3, area);
    let row = offset_x(row, app.shake.offset(), area);

    let digits = app.lock.pin().digits_for_display();
    for (i, digit) in digits.iter().enumerate() {
        let x = row.x + i as u16 * (BOX_WIDTH + 1);
        let cell = Rect::new(x, row.y, BOX_WIDTH, row.height).intersection(area);

        let (symbol, style) = match digit {
            Some(c) => (c.to_string(), theme.pin_digit()),
            None => (" ".to_string(), theme.pin_placeholder()),
        };
        let widget = Paragraph::new(symbol)
            .style(style)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.pin_box(digit.is_some(), shaking)),
            );
        frame.render_widget(widget, cell);
    }
}
