//! UI rendering module

pub mod components;
pub mod layout;
pub mod screens;
mod shake;
mod theme;

pub use shake::Shake;
pub use theme::Theme;

use lockview_core::AwaitingMethod;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear};

use crate::app::App;

/// Main render function: the wrapped content, then the overlay on top while locked
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    screens::content::draw(frame, area, app);

    let Some(method) = app.lock.awaiting_method() else {
        return;
    };

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(app.theme.overlay()), area);

    let (body, footer) = layout::body_and_footer(area);
    match method {
        AwaitingMethod::BiometricPrompt => screens::biometric::draw(frame, body, app),
        AwaitingMethod::PinEntry | AwaitingMethod::PinEntryNoBiometricHint => {
            screens::pin_entry::draw(frame, body, app)
        }
        AwaitingMethod::AwaitingSettingsChange => screens::settings_required::draw(frame, body, app),
    }

    components::status_bar::render_help_footer(frame, footer, &hints(app, method), &app.theme);
}

/// Key hints for the current lock screen
fn hints(app: &App, method: AwaitingMethod) -> Vec<(&'static str, &'static str)> {
    let mut hints = match method {
        AwaitingMethod::BiometricPrompt => {
            let mut hints = vec![("Enter", "Unlock")];
            if app.lock.policy().allows_pin() {
                hints.push(("p", "Enter PIN"));
            }
            hints
        }
        AwaitingMethod::PinEntry | AwaitingMethod::PinEntryNoBiometricHint => {
            let mut hints = vec![("0-9", "Digit"), ("⌫", "Delete"), ("f", "Forgot PIN")];
            if app.lock.show_back_to_biometric() {
                hints.push(("Esc", "Back"));
            }
            hints
        }
        AwaitingMethod::AwaitingSettingsChange => vec![("a", "Toggle biometrics")],
    };
    hints.push(("b", "Background"));
    hints.push(("^C", "Quit"));
    hints
}
