//! Immediate-mode UI: layout rect, flat widgets, pause menu
//!
//! Rebuilt each frame on top of the composited game frame, at full window
//! resolution so text stays readable at any game zoom.

mod rect;
mod widgets;

pub use rect::Rect;
pub use widgets::{button, draw_label, draw_panel, Style};

use macroquad::prelude::*;

/// What the pause menu asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseAction {
    None,
    Resume,
    Quit,
}

/// Centered panel with Resume and Quit. Immediate mode, no retained
/// selection state.
pub struct PauseMenu {
    pub style: Style,
}

impl PauseMenu {
    pub fn new() -> Self {
        Self {
            style: Style::default(),
        }
    }

    pub fn draw(&self, resolution: Vec2) -> PauseAction {
        let screen = Rect::screen(resolution.x, resolution.y);

        // Dim the frozen game frame underneath.
        draw_rectangle(0.0, 0.0, screen.w, screen.h, Color::from_rgba(0, 0, 0, 120));

        let panel = screen.centered(260.0, 200.0);
        draw_panel(panel, &self.style);
        let inner = panel.pad(30.0);
        draw_label(
            Rect::new(inner.x, panel.y + 10.0, inner.w, 40.0),
            "Paused",
            &self.style,
        );

        let button_style = Style {
            bg: Color::from_rgba(55, 55, 66, 255),
            ..self.style
        };
        let resume = Rect::new(inner.x, panel.y + 70.0, inner.w, 44.0);
        let quit = Rect::new(inner.x, panel.y + 130.0, inner.w, 44.0);

        if button(resume, "Resume", &button_style) {
            return PauseAction::Resume;
        }
        if button(quit, "Quit", &button_style) {
            return PauseAction::Quit;
        }
        PauseAction::None
    }
}

impl Default for PauseMenu {
    fn default() -> Self {
        Self::new()
    }
}
