//! Weapon aiming and bullets
//!
//! The weapon tracks its owner's center each tick and points at the
//! cursor; the cursor arrives in window space and is mapped through the
//! camera into world space before the angle is taken. Bullets are plain
//! points with a velocity and a lifetime, removed on tile contact or
//! expiry.

use macroquad::prelude::*;

use crate::camera::{Camera, Drawable};
use crate::physics::TileRect;

const BULLET_SPEED: f32 = 6.0;
const BULLET_TTL_TICKS: f32 = 90.0;
const BULLET_SIZE: i32 = 2;

pub struct Weapon {
    /// World position, pinned to the owner's center every update.
    pub pos: Vec2,
    pub size: Vec2,
    /// Radians; 0 points along +X, positive turns toward +Y (down).
    pub rotation: f32,
    /// Aiming across the Y axis mirrors the art.
    pub flip: bool,
    pub layer: i32,
}

impl Weapon {
    pub fn new(size: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            size,
            rotation: 0.0,
            flip: false,
            layer: 2,
        }
    }

    /// Follow the owner and point at the cursor (window coordinates).
    pub fn update(&mut self, owner_center: Vec2, cursor_screen: Vec2, camera: &Camera) {
        self.pos = owner_center;
        self.aim(camera.screen_to_world(cursor_screen));
    }

    /// Point at a world-space position.
    pub fn aim(&mut self, world: Vec2) {
        let delta = world - self.pos;
        self.rotation = delta.y.atan2(delta.x);
        self.flip = delta.x < 0.0;
    }

    /// Spawn a bullet travelling along the current aim.
    pub fn fire(&self) -> Bullet {
        let dir = vec2(self.rotation.cos(), self.rotation.sin());
        Bullet {
            pos: self.pos,
            vel: dir * BULLET_SPEED,
            ttl: BULLET_TTL_TICKS,
        }
    }

    pub fn drawable(&self) -> Drawable {
        Drawable::rect(
            TileRect::new(
                (self.pos.x - self.size.x * 0.5).floor() as i32,
                (self.pos.y - self.size.y * 0.5).floor() as i32,
                self.size.x as i32,
                self.size.y as i32,
            ),
            GRAY,
            self.layer,
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks.
    pub ttl: f32,
}

impl Bullet {
    fn rect(&self) -> TileRect {
        TileRect::new(
            self.pos.x.floor() as i32,
            self.pos.y.floor() as i32,
            BULLET_SIZE,
            BULLET_SIZE,
        )
    }

    fn alive(&self, tiles: &[TileRect]) -> bool {
        if self.ttl <= 0.0 {
            return false;
        }
        let rect = self.rect();
        !tiles.iter().any(|t| rect.overlaps(t))
    }
}

/// Advance every bullet and drop the dead ones in place.
pub fn update_bullets(bullets: &mut Vec<Bullet>, tiles: &[TileRect], dt: f32) {
    for bullet in bullets.iter_mut() {
        bullet.pos += bullet.vel * dt;
        bullet.ttl -= dt;
    }
    bullets.retain(|b| b.alive(tiles));
}

pub fn bullet_drawables(bullets: &[Bullet], layer: i32) -> Vec<Drawable> {
    bullets
        .iter()
        .map(|b| Drawable::rect(b.rect(), WHITE, layer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_right_and_left_sets_flip() {
        let mut weapon = Weapon::new(vec2(8.0, 4.0));
        weapon.pos = vec2(50.0, 50.0);

        weapon.aim(vec2(100.0, 50.0));
        assert!(!weapon.flip);
        assert!(weapon.rotation.abs() < 1e-6);

        weapon.aim(vec2(0.0, 50.0));
        assert!(weapon.flip);
        assert!((weapon.rotation.abs() - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn test_aim_down_is_positive_rotation() {
        // Y grows downward, so aiming below the weapon gives a positive
        // angle.
        let mut weapon = Weapon::new(vec2(8.0, 4.0));
        weapon.pos = vec2(0.0, 0.0);
        weapon.aim(vec2(0.0, 10.0));
        assert!((weapon.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_update_converts_cursor_through_camera() {
        let mut camera = Camera::new(vec2(320.0, 180.0), 2.0);
        camera.true_scroll = vec2(100.0, 0.0);
        let mut weapon = Weapon::new(vec2(8.0, 4.0));
        // Cursor at window (40, 0) maps to world (120, 0): right of the
        // owner at (110, 0), so no flip.
        weapon.update(vec2(110.0, 0.0), vec2(40.0, 0.0), &camera);
        assert!(!weapon.flip);

        // Window (10, 0) maps to world (105, 0): left of the owner.
        weapon.update(vec2(110.0, 0.0), vec2(10.0, 0.0), &camera);
        assert!(weapon.flip);
    }

    #[test]
    fn test_fire_travels_along_aim() {
        let mut weapon = Weapon::new(vec2(8.0, 4.0));
        weapon.pos = vec2(10.0, 20.0);
        weapon.aim(vec2(100.0, 20.0));
        let bullet = weapon.fire();
        assert_eq!(bullet.pos, weapon.pos);
        assert!((bullet.vel.x - BULLET_SPEED).abs() < 1e-5);
        assert!(bullet.vel.y.abs() < 1e-5);
    }

    #[test]
    fn test_bullet_despawns_on_tile_hit() {
        let tiles = [TileRect::new(40, 0, 10, 10)];
        let mut bullets = vec![Bullet {
            pos: vec2(0.0, 2.0),
            vel: vec2(6.0, 0.0),
            ttl: 1000.0,
        }];
        for _ in 0..20 {
            update_bullets(&mut bullets, &tiles, 1.0);
            if bullets.is_empty() {
                return;
            }
            // Never tunnels past the wall.
            assert!(bullets[0].pos.x < 50.0);
        }
        panic!("bullet never hit the wall");
    }

    #[test]
    fn test_bullet_expires_after_ttl() {
        let mut bullets = vec![Bullet {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            ttl: 5.0,
        }];
        for _ in 0..5 {
            update_bullets(&mut bullets, &[], 1.0);
        }
        assert!(bullets.is_empty());
    }

    #[test]
    fn test_bullets_move_scaled_by_dt() {
        let mut bullets = vec![Bullet {
            pos: Vec2::ZERO,
            vel: vec2(6.0, 0.0),
            ttl: 100.0,
        }];
        update_bullets(&mut bullets, &[], 0.5);
        assert!((bullets[0].pos.x - 3.0).abs() < 1e-5);
    }
}
