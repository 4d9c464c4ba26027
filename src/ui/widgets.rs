//! Basic UI widgets
//!
//! Immediate mode: everything is rebuilt each frame, the only state is
//! whatever the caller keeps. Drawn at full window resolution, on top of
//! the scaled game frame.

use macroquad::prelude::*;

use super::Rect;

/// Shared look for panels and buttons.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub bg: Color,
    pub text_color: Color,
    pub font_size: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            bg: Color::from_rgba(30, 30, 36, 230),
            text_color: WHITE,
            font_size: 24.0,
        }
    }
}

pub fn draw_panel(rect: Rect, style: &Style) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, style.bg);
}

/// Text centered in `rect`, rounded to integer pixels for crisp rendering.
pub fn draw_label(rect: Rect, text: &str, style: &Style) {
    let dims = measure_text(text, None, style.font_size as u16, 1.0);
    let x = (rect.center_x() - dims.width * 0.5).round();
    let y = (rect.center_y() + dims.height * 0.5).round();
    draw_text(text, x, y, style.font_size, style.text_color);
}

/// Flat button; hover brightens, press darkens. Returns true on the frame
/// the left button is released over it.
pub fn button(rect: Rect, label: &str, style: &Style) -> bool {
    let (mx, my) = mouse_position();
    let hovered = rect.contains(mx, my);
    let held = hovered && is_mouse_button_down(MouseButton::Left);

    let bg = if held {
        Color::new(style.bg.r * 0.6, style.bg.g * 0.6, style.bg.b * 0.6, style.bg.a)
    } else if hovered {
        Color::new(
            (style.bg.r * 1.6).min(1.0),
            (style.bg.g * 1.6).min(1.0),
            (style.bg.b * 1.6).min(1.0),
            style.bg.a,
        )
    } else {
        style.bg
    };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg);
    draw_label(rect, label, style);

    hovered && is_mouse_button_released(MouseButton::Left)
}
