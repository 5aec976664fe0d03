//! Layout helpers for the lock overlay

use ratatui::prelude::*;

/// Create a centered box for dialogs
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Create a fixed-size centered box
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Move a rect horizontally, clamped to `bounds`
pub fn offset_x(rect: Rect, dx: i16, bounds: Rect) -> Rect {
    let min_x = i32::from(bounds.x);
    let max_x = i32::from(bounds.x + bounds.width.saturating_sub(rect.width));
    let x = (i32::from(rect.x) + i32::from(dx)).clamp(min_x, max_x.max(min_x));
    Rect {
        x: x as u16,
        ..rect
    }
}

/// Split the overlay into body and a one-line footer
pub fn body_and_footer(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(area);
    (chunks[0], chunks[1])
}
