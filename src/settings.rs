//! Persisted settings: window, frame pacing, bindings
//!
//! Stored as pretty RON next to the executable. Loading never takes the
//! game down: a missing or corrupt file logs a warning and hands back the
//! compiled-in defaults. Key bindings are stored by name and resolved to
//! key codes at load; unknown names keep the default for that binding.

use std::fmt;
use std::fs;
use std::path::Path;

use macroquad::logging::warn;
use serde::{Deserialize, Serialize};

use crate::input::{key_from_name, key_name, KeyBindings, PadBindings};

pub const SETTINGS_PATH: &str = "settings.ron";

#[derive(Debug)]
pub enum SettingsError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SettingsError {
    fn from(e: ron::error::SpannedError) -> Self {
        SettingsError::ParseError(e)
    }
}

impl From<ron::Error> for SettingsError {
    fn from(e: ron::Error) -> Self {
        SettingsError::SerializeError(e)
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(e) => write!(f, "IO error: {}", e),
            SettingsError::ParseError(e) => write!(f, "Parse error: {}", e),
            SettingsError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

/// Key names as persisted; resolved against `KeyBindings` at load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyNames {
    pub left: String,
    pub right: String,
    pub jump: String,
    pub dash: String,
    pub shoot: String,
    pub pause: String,
}

impl From<KeyBindings> for KeyNames {
    fn from(b: KeyBindings) -> Self {
        Self {
            left: key_name(b.left).to_string(),
            right: key_name(b.right).to_string(),
            jump: key_name(b.jump).to_string(),
            dash: key_name(b.dash).to_string(),
            shoot: key_name(b.shoot).to_string(),
            pause: key_name(b.pause).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PadButtons {
    pub jump: u32,
    pub dash: u32,
    pub shoot: u32,
    pub pause: u32,
}

impl From<PadBindings> for PadButtons {
    fn from(b: PadBindings) -> Self {
        Self {
            jump: b.jump,
            dash: b.dash,
            shoot: b.shoot,
            pause: b.pause,
        }
    }
}

impl From<PadButtons> for PadBindings {
    fn from(b: PadButtons) -> Self {
        Self {
            jump: b.jump,
            dash: b.dash,
            shoot: b.shoot,
            pause: b.pause,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub resolution: (i32, i32),
    pub target_fps: u32,
    pub keyboard: KeyNames,
    pub gamepad: PadButtons,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: (1280, 720),
            target_fps: 120,
            keyboard: KeyBindings::default().into(),
            gamepad: PadBindings::default().into(),
        }
    }
}

impl Settings {
    /// Load from `path`; any failure logs a warning and returns defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("could not load {:?} ({}), using defaults", path.as_ref(), e);
                Self::default()
            }
        }
    }

    fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .indentor("  ".to_string());
        let text = ron::ser::to_string_pretty(self, config)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Resolve the stored key names. Unknown names keep the default for
    /// that binding, with a warning each.
    pub fn key_bindings(&self) -> KeyBindings {
        let defaults = KeyBindings::default();
        let resolve = |name: &str, default| match key_from_name(name) {
            Some(key) => key,
            None => {
                warn!("unknown key name '{}', keeping default", name);
                default
            }
        };
        KeyBindings {
            left: resolve(&self.keyboard.left, defaults.left),
            right: resolve(&self.keyboard.right, defaults.right),
            jump: resolve(&self.keyboard.jump, defaults.jump),
            dash: resolve(&self.keyboard.dash, defaults.dash),
            shoot: resolve(&self.keyboard.shoot, defaults.shoot),
            pause: resolve(&self.keyboard.pause, defaults.pause),
        }
    }

    pub fn pad_bindings(&self) -> PadBindings {
        self.gamepad.into()
    }
}
