//! Shown when the policy needs biometrics the device cannot provide

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::App;
use crate::ui::layout::centered_rect_fixed;

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let dialog = centered_rect_fixed(44, 7, area);
    let block = Block::default()
        .title(" Biometrics unavailable ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.warning());
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let message = Paragraph::new("Enable biometric authentication in Settings to unlock the view.")
        .style(theme.text())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(message, inner.inner(Margin::new(1, 1)));
}
