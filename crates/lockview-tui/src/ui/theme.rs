//! Visual theme and color palette

use ratatui::style::{Color, Modifier, Style};

/// Lockview color palette
pub struct Theme {
    // Overlay colors
    pub accent: Color,
    pub overlay: Color,

    // Status colors
    pub warning: Color,
    pub danger: Color,

    // UI element colors
    pub border: Color,
    pub border_focused: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(0, 122, 255),  // #007AFF
            overlay: Color::Rgb(18, 18, 18),  // #121212

            warning: Color::Rgb(255, 152, 0), // #FF9800
            danger: Color::Rgb(244, 67, 54),  // #F44336

            border: Color::Rgb(66, 66, 66),            // #424242
            border_focused: Color::Rgb(0, 122, 255),   // #007AFF
            text_primary: Color::Rgb(250, 250, 250),   // #FAFAFA
            text_secondary: Color::Rgb(189, 189, 189), // #BDBDBD
            text_muted: Color::Rgb(117, 117, 117),     // #757575
        }
    }
}

impl Theme {
    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Key hints and tappable labels
    pub fn text_highlight(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn danger(&self) -> Style {
        Style::default()
            .fg(self.danger)
            .add_modifier(Modifier::BOLD)
    }

    /// Full-screen backdrop that hides the wrapped content
    pub fn overlay(&self) -> Style {
        Style::default().bg(self.overlay).fg(self.text_primary)
    }

    /// Typed PIN digit
    pub fn pin_digit(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Get PIN placeholder style
    pub fn pin_placeholder(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Border of one PIN box; red while the wrong-PIN shake plays
    pub fn pin_box(&self, filled: bool, shaking: bool) -> Style {
        if shaking {
            Style::default().fg(self.danger)
        } else if filled {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }
}
