//! Status line and key hints

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::Theme;

/// Render a one-line status message, red when it reports a failure
pub fn render_status(frame: &mut Frame, area: Rect, message: Option<&str>, error: bool, theme: &Theme) {
    let Some(message) = message else {
        return;
    };
    let style = if error {
        theme.danger()
    } else {
        theme.text_secondary()
    };
    let paragraph = Paragraph::new(message)
        .style(style)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Render help hints in footer
pub fn render_help_footer(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], theme: &Theme) {
    let hint_spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, action)| {
            vec![
                Span::styled(format!("[{}]", key), theme.text_highlight()),
                Span::styled(format!(" {} ", action), theme.text_muted()),
                Span::raw(" "),
            ]
        })
        .collect();

    let line = Line::from(hint_spans);
    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
