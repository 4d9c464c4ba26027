//! Sprite: binds an entity to its animation clips
//!
//! A sprite owns only the playback state (which clip, which frame, flip);
//! the textures stay in the shared `AnimationLibrary`. Switching to the
//! action already playing is a no-op so clips are never restarted
//! mid-cycle by a repeated state.

use macroquad::prelude::{vec2, Vec2};

use crate::animation::{Animation, AnimationLibrary};
use crate::camera::Drawable;

/// Art is padded a few pixels around the collision box; the offset lines
/// the frame up with the body rect.
const DEFAULT_OFFSET: Vec2 = vec2(-3.0, -3.0);

pub struct Sprite {
    /// Entity tag, the first half of the clip key.
    pub tag: String,
    action: String,
    animation: Animation,
    pub flip_x: bool,
    /// Drawn at body position plus this offset.
    pub offset: Vec2,
    pub layer: i32,
}

impl Sprite {
    /// Requires `library.validate(tag, ...)` to have passed for `action`.
    pub fn new(library: &AnimationLibrary, tag: &str, action: &str) -> Self {
        Self {
            tag: tag.to_string(),
            action: action.to_string(),
            animation: library.template(&format!("{}/{}", tag, action)),
            flip_x: false,
            offset: DEFAULT_OFFSET,
            layer: 0,
        }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Switch clips, restarting playback only when the action changed.
    pub fn set_action(&mut self, library: &AnimationLibrary, action: &str) {
        if self.action == action {
            return;
        }
        self.action = action.to_string();
        self.animation = library.template(&self.key());
    }

    pub fn update(&mut self, dt: f32) {
        self.animation.update(dt);
    }

    /// Current frame as a camera drawable, placed at `pos + offset`.
    pub fn drawable(&self, library: &AnimationLibrary, pos: Vec2) -> Option<Drawable> {
        let texture = library.frame(&self.key(), &self.animation)?;
        Some(Drawable::Image {
            texture: texture.clone(),
            pos: pos + self.offset,
            layer: self.layer,
            rotation: 0.0,
            flip_x: self.flip_x,
        })
    }

    fn key(&self) -> String {
        format!("{}/{}", self.tag, self.action)
    }
}
