//! gilrs-backed gamepad polling (native only)
//!
//! Buttons are flattened into a bit mask using the standard Xbox-layout
//! indices. `poll` snapshots the mask once per frame and derives the
//! newly-pressed mask from the previous frame's snapshot, so edge queries
//! are pure reads and any number of them see the same frame. Stick input
//! goes through a radial deadzone with linear rescaling.

use gilrs::{Axis, Button as GilrsButton, Gilrs};
use macroquad::prelude::Vec2;

// Standard gamepad button indices (Xbox layout).
pub mod button {
    pub const A: u32 = 0; // South
    pub const B: u32 = 1; // East
    pub const X: u32 = 2; // West
    pub const Y: u32 = 3; // North
    pub const LB: u32 = 4;
    pub const RB: u32 = 5;
    pub const LT: u32 = 6;
    pub const RT: u32 = 7;
    pub const SELECT: u32 = 8;
    pub const START: u32 = 9;
    pub const L3: u32 = 10;
    pub const R3: u32 = 11;
    pub const DPAD_UP: u32 = 12;
    pub const DPAD_DOWN: u32 = 13;
    pub const DPAD_LEFT: u32 = 14;
    pub const DPAD_RIGHT: u32 = 15;
}

pub struct Gamepad {
    gilrs: Gilrs,
    deadzone: f32,
    /// This frame's button mask, snapshotted in `poll`.
    buttons: u32,
    /// Buttons down this frame that were up last frame.
    pressed: u32,
}

impl Gamepad {
    /// Backend init can fail (no evdev, sandboxed, etc.); callers fall
    /// back to keyboard-only.
    pub fn try_new() -> Result<Self, gilrs::Error> {
        Ok(Self {
            gilrs: Gilrs::new()?,
            deadzone: 0.15,
            buttons: 0,
            pressed: 0,
        })
    }

    /// Once per frame: drain the event queue, then advance the edge state.
    pub fn poll(&mut self) {
        while self.gilrs.next_event().is_some() {}
        let current = self.button_mask();
        self.pressed = newly_pressed(self.buttons, current);
        self.buttons = current;
    }

    pub fn has_gamepad(&self) -> bool {
        self.gilrs.gamepads().next().is_some()
    }

    fn active_gamepad(&self) -> Option<gilrs::Gamepad> {
        self.gilrs.gamepads().next().map(|(_, gp)| gp)
    }

    fn button_mask(&self) -> u32 {
        let Some(gp) = self.active_gamepad() else { return 0 };
        let mut mask = 0u32;

        if gp.is_pressed(GilrsButton::South) { mask |= 1 << button::A; }
        if gp.is_pressed(GilrsButton::East) { mask |= 1 << button::B; }
        if gp.is_pressed(GilrsButton::West) { mask |= 1 << button::X; }
        if gp.is_pressed(GilrsButton::North) { mask |= 1 << button::Y; }
        if gp.is_pressed(GilrsButton::LeftTrigger) { mask |= 1 << button::LB; }
        if gp.is_pressed(GilrsButton::RightTrigger) { mask |= 1 << button::RB; }
        if gp.is_pressed(GilrsButton::LeftTrigger2) { mask |= 1 << button::LT; }
        if gp.is_pressed(GilrsButton::RightTrigger2) { mask |= 1 << button::RT; }
        if gp.is_pressed(GilrsButton::Select) { mask |= 1 << button::SELECT; }
        if gp.is_pressed(GilrsButton::Start) { mask |= 1 << button::START; }
        if gp.is_pressed(GilrsButton::LeftThumb) { mask |= 1 << button::L3; }
        if gp.is_pressed(GilrsButton::RightThumb) { mask |= 1 << button::R3; }
        if gp.is_pressed(GilrsButton::DPadUp) { mask |= 1 << button::DPAD_UP; }
        if gp.is_pressed(GilrsButton::DPadDown) { mask |= 1 << button::DPAD_DOWN; }
        if gp.is_pressed(GilrsButton::DPadLeft) { mask |= 1 << button::DPAD_LEFT; }
        if gp.is_pressed(GilrsButton::DPadRight) { mask |= 1 << button::DPAD_RIGHT; }

        mask
    }

    pub fn is_button_down(&self, button: u32) -> bool {
        (self.buttons & (1 << button)) != 0
    }

    /// Down this frame but not the last. Pure read against the `poll`
    /// snapshot; querying one button never affects another.
    pub fn is_button_pressed(&self, button: u32) -> bool {
        (self.pressed & (1 << button)) != 0
    }

    pub fn left_stick(&self) -> Vec2 {
        let Some(gp) = self.active_gamepad() else { return Vec2::ZERO };
        let x = gp.value(Axis::LeftStickX);
        let y = -gp.value(Axis::LeftStickY); // gilrs Y is up, screen Y is down
        apply_deadzone(x, y, self.deadzone)
    }
}

/// Bits set in `current` but not in `last`.
fn newly_pressed(last: u32, current: u32) -> u32 {
    current & !last
}

/// Radial deadzone with linear rescaling from deadzone..1.0 to 0.0..1.0.
pub fn apply_deadzone(x: f32, y: f32, deadzone: f32) -> Vec2 {
    let len = (x * x + y * y).sqrt();
    if len < deadzone {
        return Vec2::ZERO;
    }
    let scale = (len - deadzone) / (1.0 - deadzone) / len;
    Vec2::new(x * scale, y * scale)
}
