//! Animation clips and the folder-backed frame library
//!
//! Clips are keyed `"{tag}/{action}"` (e.g. `"player/run"`) and loaded from
//! `assets/images/entities/<tag>/<action>/` with frames in sorted file
//! order. Per-clip timing comes from an optional RON table; anything not
//! listed uses the defaults. Entities validate the actions they use once at
//! startup, so per-frame lookups are infallible afterwards.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use macroquad::logging::warn;
use macroquad::texture::{FilterMode, Texture2D};
use serde::Deserialize;

const DEFAULT_FRAME_DURATION: f32 = 0.2;

/// Error type for animation asset loading
#[derive(Debug)]
pub enum AssetError {
    Io(std::io::Error),
    Decode(String),
    ParseError(ron::error::SpannedError),
    /// A clip an entity declared it needs is not in the library.
    MissingClip(String),
    /// A clip directory exists but holds no frames.
    EmptyClip(String),
    /// Metadata carries a zero or negative frame duration.
    InvalidDuration(String),
}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        AssetError::Io(e)
    }
}

impl From<ron::error::SpannedError> for AssetError {
    fn from(e: ron::error::SpannedError) -> Self {
        AssetError::ParseError(e)
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(e) => write!(f, "IO error: {}", e),
            AssetError::Decode(e) => write!(f, "Image decode error: {}", e),
            AssetError::ParseError(e) => write!(f, "Metadata parse error: {}", e),
            AssetError::MissingClip(key) => write!(f, "Missing animation clip: {}", key),
            AssetError::EmptyClip(key) => write!(f, "Animation clip has no frames: {}", key),
            AssetError::InvalidDuration(key) => {
                write!(f, "Non-positive frame duration for clip: {}", key)
            }
        }
    }
}

/// Frame-timing state of one playing clip.
///
/// Pure timing: frame textures live in the library's `AnimationSet`, which
/// lets entities copy a fresh `Animation` per action switch without
/// duplicating textures.
#[derive(Debug, Clone, Copy)]
pub struct Animation {
    pub frame_count: usize,
    /// Seconds each frame stays on screen.
    pub frame_duration: f32,
    pub looped: bool,
    /// Latched once a non-looping clip reaches its last frame.
    pub done: bool,
    frame: usize,
    elapsed: f32,
}

impl Animation {
    pub fn new(frame_count: usize, frame_duration: f32, looped: bool) -> Self {
        Self {
            frame_count: frame_count.max(1),
            frame_duration,
            looped,
            done: false,
            frame: 0,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds, consuming whole frame durations.
    pub fn update(&mut self, dt: f32) {
        // Non-positive durations never pass `load`, but this loop must
        // terminate for any constructed value.
        if self.frame_duration <= 0.0 {
            return;
        }
        self.elapsed += dt;
        while self.elapsed >= self.frame_duration {
            self.elapsed -= self.frame_duration;
            if self.looped {
                self.frame = (self.frame + 1) % self.frame_count;
            } else {
                self.frame = (self.frame + 1).min(self.frame_count - 1);
                if self.frame == self.frame_count - 1 {
                    self.done = true;
                }
            }
        }
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }
}

/// Per-clip timing overrides, deserialized from the RON metadata table.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ClipMeta {
    pub frame_duration: f32,
    #[serde(default = "default_looped")]
    pub looped: bool,
}

fn default_looped() -> bool {
    true
}

/// The frames of one clip plus the timing template entities copy from.
pub struct AnimationSet {
    pub frames: Vec<Texture2D>,
    pub template: Animation,
}

/// All loaded clips, keyed `"{tag}/{action}"`.
pub struct AnimationLibrary {
    sets: HashMap<String, AnimationSet>,
}

impl AnimationLibrary {
    /// Load every `<tag>/<action>` folder under `base`, with timing from
    /// the RON table at `meta_path` when present.
    pub fn load(base: &Path, meta_path: &Path) -> Result<Self, AssetError> {
        let meta = load_meta(meta_path)?;
        validate_meta(&meta)?;
        let mut sets = HashMap::new();

        for tag_dir in sorted_dirs(base)? {
            let tag = dir_name(&tag_dir);
            for action_dir in sorted_dirs(&tag_dir)? {
                let key = format!("{}/{}", tag, dir_name(&action_dir));
                let frames = load_frames(&action_dir)?;
                if frames.is_empty() {
                    return Err(AssetError::EmptyClip(key));
                }
                let template = match meta.get(&key) {
                    Some(m) => Animation::new(frames.len(), m.frame_duration, m.looped),
                    None => Animation::new(frames.len(), DEFAULT_FRAME_DURATION, true),
                };
                sets.insert(key, AnimationSet { frames, template });
            }
        }

        Ok(Self { sets })
    }

    pub fn get(&self, key: &str) -> Option<&AnimationSet> {
        self.sets.get(key)
    }

    /// Fresh timing state for a clip. Only call for keys that passed
    /// `validate`; an unknown key here is a programming error and halts.
    pub fn template(&self, key: &str) -> Animation {
        match self.sets.get(key) {
            Some(set) => set.template,
            None => panic!("animation clip '{}' requested but never validated", key),
        }
    }

    /// Current frame texture for a clip.
    pub fn frame(&self, key: &str, animation: &Animation) -> Option<&Texture2D> {
        self.get(key).and_then(|set| set.frames.get(animation.frame_index()))
    }

    /// Startup check: every action this entity tag uses must be present.
    pub fn validate(&self, tag: &str, actions: &[&str]) -> Result<(), AssetError> {
        for action in actions {
            let key = format!("{}/{}", tag, action);
            if !self.sets.contains_key(&key) {
                return Err(AssetError::MissingClip(key));
            }
        }
        Ok(())
    }
}

fn load_meta(path: &Path) -> Result<HashMap<String, ClipMeta>, AssetError> {
    if !path.exists() {
        warn!("no animation metadata at {:?}, using defaults", path);
        return Ok(HashMap::new());
    }
    let text = fs::read_to_string(path)?;
    Ok(ron::from_str(&text)?)
}

/// A broken timing entry is a configuration error; refuse it at startup
/// instead of looping on it mid-game.
fn validate_meta(meta: &HashMap<String, ClipMeta>) -> Result<(), AssetError> {
    for (key, m) in meta {
        if m.frame_duration <= 0.0 {
            return Err(AssetError::InvalidDuration(key.clone()));
        }
    }
    Ok(())
}

/// Subdirectories of `dir`, sorted by name for deterministic load order.
fn sorted_dirs(dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Decode every PNG in the clip directory, sorted by filename.
fn load_frames(dir: &Path) -> Result<Vec<Texture2D>, AssetError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|e| e == "png").unwrap_or(false))
        .collect();
    files.sort();

    let mut frames = Vec::with_capacity(files.len());
    for file in files {
        let img = image::open(&file)
            .map_err(|e| AssetError::Decode(format!("{:?}: {}", file, e)))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        let texture = Texture2D::from_rgba8(w as u16, h as u16, &img.into_raw());
        texture.set_filter(FilterMode::Nearest);
        frames.push(texture);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looping_clip_wraps() {
        let mut anim = Animation::new(4, 0.1, true);
        for _ in 0..5 {
            anim.update(0.1);
        }
        assert_eq!(anim.frame_index(), 1);
        assert!(!anim.done);
    }

    #[test]
    fn test_non_looping_clip_latches_done() {
        let mut anim = Animation::new(3, 0.1, false);
        for _ in 0..10 {
            anim.update(0.1);
        }
        assert_eq!(anim.frame_index(), 2);
        assert!(anim.done);
    }

    #[test]
    fn test_update_consumes_multiple_frames_in_one_step() {
        let mut anim = Animation::new(8, 0.1, true);
        anim.update(0.35);
        assert_eq!(anim.frame_index(), 3);
    }

    #[test]
    fn test_small_steps_accumulate() {
        let mut anim = Animation::new(4, 0.2, true);
        for _ in 0..3 {
            anim.update(0.05);
        }
        assert_eq!(anim.frame_index(), 0);
        anim.update(0.05);
        assert_eq!(anim.frame_index(), 1);
    }

    #[test]
    fn test_single_frame_clip_is_immediately_done() {
        let mut anim = Animation::new(1, 0.1, false);
        anim.update(0.2);
        assert_eq!(anim.frame_index(), 0);
        assert!(anim.done);
    }

    #[test]
    fn test_zero_duration_clip_does_not_hang_or_advance() {
        let mut anim = Animation::new(4, 0.0, true);
        anim.update(0.1);
        assert_eq!(anim.frame_index(), 0);

        let mut anim = Animation::new(4, -0.5, false);
        anim.update(1.0);
        assert_eq!(anim.frame_index(), 0);
        assert!(!anim.done);
    }

    #[test]
    fn test_meta_with_zero_duration_is_rejected() {
        let meta: HashMap<String, ClipMeta> =
            ron::from_str(r#"{ "player/run": (frame_duration: 0.0) }"#).unwrap();
        match validate_meta(&meta) {
            Err(AssetError::InvalidDuration(key)) => assert_eq!(key, "player/run"),
            other => panic!("expected InvalidDuration, got {:?}", other.map(|_| ())),
        }

        let ok: HashMap<String, ClipMeta> =
            ron::from_str(r#"{ "player/run": (frame_duration: 0.08) }"#).unwrap();
        assert!(validate_meta(&ok).is_ok());
    }

    #[test]
    fn test_meta_parses_from_ron() {
        let text = r#"{
            "player/run": (frame_duration: 0.08),
            "player/jump": (frame_duration: 0.15, looped: false),
        }"#;
        let meta: HashMap<String, ClipMeta> = ron::from_str(text).unwrap();
        assert!((meta["player/run"].frame_duration - 0.08).abs() < 1e-6);
        assert!(meta["player/run"].looped);
        assert!(!meta["player/jump"].looped);
    }
}
