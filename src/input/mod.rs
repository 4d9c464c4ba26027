//! Input devices behind one polling surface
//!
//! Each device turns raw key/button state into the same two records every
//! frame: edge-triggered `Actions` and level-triggered `DirectionInput`.
//! The gamepad path only exists on native builds; when no pad is present
//! the game runs keyboard-only.

#[cfg(not(target_arch = "wasm32"))]
mod gamepad;

#[cfg(not(target_arch = "wasm32"))]
pub use gamepad::{button, Gamepad};

use macroquad::logging::{info, warn};
use macroquad::prelude::{is_key_down, is_key_pressed, KeyCode};

/// One-frame action edges. Consumed by the app every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actions {
    pub jump: bool,
    pub dash: bool,
    pub shoot: bool,
    pub pause: bool,
}

/// Held movement state. `axis` scales acceleration: stick magnitude on a
/// gamepad, always 1.0 on keyboard.
#[derive(Debug, Clone, Copy)]
pub struct DirectionInput {
    pub left: bool,
    pub right: bool,
    pub axis: f32,
}

impl Default for DirectionInput {
    fn default() -> Self {
        Self {
            left: false,
            right: false,
            axis: 1.0,
        }
    }
}

/// Resolved keyboard bindings.
#[derive(Debug, Clone, Copy)]
pub struct KeyBindings {
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
    pub dash: KeyCode,
    pub shoot: KeyCode,
    pub pause: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: KeyCode::A,
            right: KeyCode::D,
            jump: KeyCode::Space,
            dash: KeyCode::LeftShift,
            shoot: KeyCode::F,
            pause: KeyCode::Escape,
        }
    }
}

/// Gamepad bindings as standard button indices (see `button`).
#[derive(Debug, Clone, Copy)]
pub struct PadBindings {
    pub jump: u32,
    pub dash: u32,
    pub shoot: u32,
    pub pause: u32,
}

impl Default for PadBindings {
    fn default() -> Self {
        Self {
            jump: 0,  // A
            dash: 2,  // X
            shoot: 7, // RT
            pause: 9, // START
        }
    }
}

/// A pollable input source.
pub enum InputDevice {
    Keyboard(KeyBindings),
    #[cfg(not(target_arch = "wasm32"))]
    Gamepad(Gamepad, PadBindings),
}

impl InputDevice {
    /// Pump backend events. Keyboard state is pumped by the window loop.
    pub fn poll(&mut self) {
        match self {
            InputDevice::Keyboard(_) => {}
            #[cfg(not(target_arch = "wasm32"))]
            InputDevice::Gamepad(pad, _) => pad.poll(),
        }
    }

    /// Edge-triggered actions for this frame.
    pub fn actions(&self) -> Actions {
        match self {
            InputDevice::Keyboard(keys) => Actions {
                jump: is_key_pressed(keys.jump),
                dash: is_key_pressed(keys.dash),
                shoot: is_key_pressed(keys.shoot),
                pause: is_key_pressed(keys.pause),
            },
            #[cfg(not(target_arch = "wasm32"))]
            InputDevice::Gamepad(pad, binds) => Actions {
                jump: pad.is_button_pressed(binds.jump),
                dash: pad.is_button_pressed(binds.dash),
                shoot: pad.is_button_pressed(binds.shoot),
                pause: pad.is_button_pressed(binds.pause),
            },
        }
    }

    /// Held movement state for this frame.
    pub fn direction(&self) -> DirectionInput {
        match self {
            InputDevice::Keyboard(keys) => DirectionInput {
                left: is_key_down(keys.left),
                right: is_key_down(keys.right),
                axis: 1.0,
            },
            #[cfg(not(target_arch = "wasm32"))]
            InputDevice::Gamepad(pad, _) => {
                let stick = pad.left_stick();
                let dpad_left = pad.is_button_down(button::DPAD_LEFT);
                let dpad_right = pad.is_button_down(button::DPAD_RIGHT);
                DirectionInput {
                    left: stick.x < 0.0 || dpad_left,
                    right: stick.x > 0.0 || dpad_right,
                    // Digital dpad presses run at full strength.
                    axis: if stick.x != 0.0 { stick.x.abs() } else { 1.0 },
                }
            }
        }
    }
}

/// Keyboard always; a gamepad is added when the backend comes up and a pad
/// is plugged in. Anything short of that is logged and skipped.
pub fn detect_devices(keys: KeyBindings, pad_binds: PadBindings) -> Vec<InputDevice> {
    let mut devices = vec![InputDevice::Keyboard(keys)];

    #[cfg(not(target_arch = "wasm32"))]
    match Gamepad::try_new() {
        Ok(pad) if pad.has_gamepad() => {
            info!("gamepad connected");
            devices.push(InputDevice::Gamepad(pad, pad_binds));
        }
        Ok(_) => info!("no gamepad plugged in, keyboard only"),
        Err(e) => warn!("gamepad backend unavailable ({}), keyboard only", e),
    }
    #[cfg(target_arch = "wasm32")]
    let _ = pad_binds;

    devices
}

/// Key names as stored in the settings file. Unknown names get a warning
/// and `None`; the caller keeps its default for that binding.
pub fn key_from_name(name: &str) -> Option<KeyCode> {
    let key = match name {
        "A" => KeyCode::A,
        "B" => KeyCode::B,
        "C" => KeyCode::C,
        "D" => KeyCode::D,
        "E" => KeyCode::E,
        "F" => KeyCode::F,
        "G" => KeyCode::G,
        "H" => KeyCode::H,
        "I" => KeyCode::I,
        "J" => KeyCode::J,
        "K" => KeyCode::K,
        "L" => KeyCode::L,
        "M" => KeyCode::M,
        "N" => KeyCode::N,
        "O" => KeyCode::O,
        "P" => KeyCode::P,
        "Q" => KeyCode::Q,
        "R" => KeyCode::R,
        "S" => KeyCode::S,
        "T" => KeyCode::T,
        "U" => KeyCode::U,
        "V" => KeyCode::V,
        "W" => KeyCode::W,
        "X" => KeyCode::X,
        "Y" => KeyCode::Y,
        "Z" => KeyCode::Z,
        "Space" => KeyCode::Space,
        "Escape" => KeyCode::Escape,
        "Enter" => KeyCode::Enter,
        "Tab" => KeyCode::Tab,
        "LeftShift" => KeyCode::LeftShift,
        "RightShift" => KeyCode::RightShift,
        "LeftControl" => KeyCode::LeftControl,
        "RightControl" => KeyCode::RightControl,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        _ => return None,
    };
    Some(key)
}

/// Inverse of `key_from_name` for the bindings we persist.
pub fn key_name(key: KeyCode) -> &'static str {
    match key {
        KeyCode::A => "A",
        KeyCode::B => "B",
        KeyCode::C => "C",
        KeyCode::D => "D",
        KeyCode::E => "E",
        KeyCode::F => "F",
        KeyCode::G => "G",
        KeyCode::H => "H",
        KeyCode::I => "I",
        KeyCode::J => "J",
        KeyCode::K => "K",
        KeyCode::L => "L",
        KeyCode::M => "M",
        KeyCode::N => "N",
        KeyCode::O => "O",
        KeyCode::P => "P",
        KeyCode::Q => "Q",
        KeyCode::R => "R",
        KeyCode::S => "S",
        KeyCode::T => "T",
        KeyCode::U => "U",
        KeyCode::V => "V",
        KeyCode::W => "W",
        KeyCode::X => "X",
        KeyCode::Y => "Y",
        KeyCode::Z => "Z",
        KeyCode::Space => "Space",
        KeyCode::Escape => "Escape",
        KeyCode::Enter => "Enter",
        KeyCode::Tab => "Tab",
        KeyCode::LeftShift => "LeftShift",
        KeyCode::RightShift => "RightShift",
        KeyCode::LeftControl => "LeftControl",
        KeyCode::RightControl => "RightControl",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_round_trip() {
        let binds = KeyBindings::default();
        for key in [
            binds.left,
            binds.right,
            binds.jump,
            binds.dash,
            binds.shoot,
            binds.pause,
        ] {
            assert_eq!(key_from_name(key_name(key)), Some(key));
        }
    }

    #[test]
    fn test_unknown_key_name_is_none() {
        assert_eq!(key_from_name("NotAKey"), None);
        assert_eq!(key_from_name(""), None);
    }

    #[test]
    fn test_direction_default_is_full_axis() {
        let dir = DirectionInput::default();
        assert!(!dir.left && !dir.right);
        assert_eq!(dir.axis, 1.0);
    }
}
