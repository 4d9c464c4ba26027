//! Game shell: state, per-frame orchestration
//!
//! The frame order is fixed: poll input, apply the drained actions, step
//! the simulation, then render (world through the camera, UI on top at
//! window resolution). Input polling is split from action application so
//! the simulation-facing half stays testable without a window.

use macroquad::logging::warn;
use macroquad::prelude::*;

use crate::animation::AnimationLibrary;
use crate::camera::{Camera, Drawable, Focus};
use crate::input::{Actions, DirectionInput, InputDevice};
use crate::physics::TileRect;
use crate::player::{Facing, Player};
use crate::settings::{Settings, SETTINGS_PATH};
use crate::sprite::Sprite;
use crate::ui::{PauseAction, PauseMenu};
use crate::weapon::{bullet_drawables, update_bullets, Bullet, Weapon};

const CLEAR_COLOR: Color = Color::new(0.35, 0.55, 0.8, 1.0);
const TILE_COLOR: Color = Color::new(0.25, 0.22, 0.2, 1.0);
const PLAYER_COLOR: Color = Color::new(0.9, 0.3, 0.25, 1.0);

const TILE_LAYER: i32 = 0;
const PLAYER_LAYER: i32 = 1;
const BULLET_LAYER: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
}

/// Built-in test course: a long floor with a few platforms and walls.
fn course() -> Vec<TileRect> {
    vec![
        TileRect::new(0, 100, 3000, 20),
        TileRect::new(200, 70, 60, 10),
        TileRect::new(320, 45, 60, 10),
        TileRect::new(500, 60, 80, 10),
        TileRect::new(-20, -200, 20, 320),
        TileRect::new(700, 40, 20, 60),
    ]
}

pub struct App {
    pub settings: Settings,
    /// None when no asset folder was found; entities render as rects.
    library: Option<AnimationLibrary>,
    devices: Vec<InputDevice>,
    player: Player,
    player_sprite: Option<Sprite>,
    weapon: Weapon,
    bullets: Vec<Bullet>,
    tiles: Vec<TileRect>,
    pub camera: Camera,
    pause_menu: PauseMenu,
    pub state: GameState,
    pub quit: bool,
    cursor: Vec2,
    axis_scale: f32,
}

impl App {
    pub fn new(
        settings: Settings,
        library: Option<AnimationLibrary>,
        devices: Vec<InputDevice>,
    ) -> Self {
        let resolution = vec2(settings.resolution.0 as f32, settings.resolution.1 as f32);
        let mut camera = Camera::new(resolution, 4.0);
        camera.panning = true;

        let player = Player::spawn(vec2(50.0, 50.0));
        let player_sprite = library
            .as_ref()
            .map(|lib| Sprite::new(lib, "player", player.action.name()));

        Self {
            settings,
            library,
            devices,
            player,
            player_sprite,
            weapon: Weapon::new(vec2(8.0, 4.0)),
            bullets: Vec::new(),
            tiles: course(),
            camera,
            pause_menu: PauseMenu::new(),
            state: GameState::Playing,
            quit: false,
            cursor: Vec2::ZERO,
            axis_scale: 1.0,
        }
    }

    /// Poll every device and hand the merged result to the simulation.
    pub fn handle_input(&mut self) {
        self.cursor = mouse_position().into();

        let mut actions = Actions::default();
        let mut direction = DirectionInput::default();
        for device in &mut self.devices {
            device.poll();
            let a = device.actions();
            actions.jump |= a.jump;
            actions.dash |= a.dash;
            actions.shoot |= a.shoot;
            actions.pause |= a.pause;

            // Last device with a held direction wins the axis scale.
            let d = device.direction();
            if d.left || d.right {
                direction = d;
            }
        }

        self.apply_input(actions, direction);
    }

    /// Simulation-facing half of input handling.
    pub fn apply_input(&mut self, actions: Actions, direction: DirectionInput) {
        if actions.pause {
            self.toggle_pause();
        }
        if self.state != GameState::Playing {
            return;
        }

        self.player.intent.left = direction.left;
        self.player.intent.right = direction.right;
        self.axis_scale = direction.axis;

        if actions.jump {
            self.player.jump();
        }
        if actions.dash {
            self.player.dash();
        }
        if actions.shoot {
            self.bullets.push(self.weapon.fire());
        }
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
        };
    }

    /// One simulation step. `dt` is the normalized tick delta.
    pub fn update(&mut self, dt: f32) {
        if self.state != GameState::Playing {
            return;
        }

        self.player.update(&self.tiles, dt, self.axis_scale);
        self.weapon
            .update(self.player.body.rect.center(), self.cursor, &self.camera);
        update_bullets(&mut self.bullets, &self.tiles, dt);

        if let (Some(sprite), Some(library)) = (&mut self.player_sprite, &self.library) {
            sprite.set_action(library, self.player.action.name());
            sprite.flip_x = self.player.facing == Facing::Left;
            sprite.update(dt / self.settings.target_fps.max(1) as f32);
        }

        self.camera.update(dt, Focus::Single(self.player.body.rect));
    }

    /// Compose the frame, then the UI overlay at window resolution.
    pub fn render(&mut self) {
        let mut drawables: Vec<Drawable> = self
            .tiles
            .iter()
            .map(|t| Drawable::rect(*t, TILE_COLOR, TILE_LAYER))
            .collect();

        drawables.push(self.player_drawable());
        drawables.push(self.weapon.drawable());
        drawables.extend(bullet_drawables(&self.bullets, BULLET_LAYER));

        self.camera.render(drawables, CLEAR_COLOR);

        if self.state == GameState::Paused {
            match self.pause_menu.draw(self.camera.resolution) {
                PauseAction::Resume => self.state = GameState::Playing,
                PauseAction::Quit => self.request_quit(),
                PauseAction::None => {}
            }
        }
    }

    /// Sprite frame when assets are loaded, collision-box rect otherwise.
    fn player_drawable(&self) -> Drawable {
        if let (Some(sprite), Some(library)) = (&self.player_sprite, &self.library) {
            let pos = vec2(self.player.body.rect.x as f32, self.player.body.rect.y as f32);
            if let Some(drawable) = sprite.drawable(library, pos) {
                return drawable;
            }
        }
        Drawable::rect(self.player.body.rect, PLAYER_COLOR, PLAYER_LAYER)
    }

    /// Flush settings and leave the loop at the end of this frame.
    pub fn request_quit(&mut self) {
        if let Err(e) = self.settings.save(SETTINGS_PATH) {
            warn!("could not save settings: {}", e);
        }
        self.quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyBindings;

    fn app() -> App {
        let devices = vec![InputDevice::Keyboard(KeyBindings::default())];
        App::new(Settings::default(), None, devices)
    }

    #[test]
    fn test_pause_toggles_and_freezes_simulation() {
        let mut a = app();
        assert_eq!(a.state, GameState::Playing);

        a.apply_input(
            Actions {
                pause: true,
                ..Actions::default()
            },
            DirectionInput::default(),
        );
        assert_eq!(a.state, GameState::Paused);

        let pos_before = a.player.body.pos;
        a.update(1.0);
        assert_eq!(a.player.body.pos, pos_before);

        a.toggle_pause();
        assert_eq!(a.state, GameState::Playing);
    }

    #[test]
    fn test_input_ignored_while_paused() {
        let mut a = app();
        a.toggle_pause();
        a.apply_input(
            Actions {
                jump: true,
                shoot: true,
                ..Actions::default()
            },
            DirectionInput {
                right: true,
                ..DirectionInput::default()
            },
        );
        assert_eq!(a.player.current_jumps, 0);
        assert!(a.bullets.is_empty());
        assert!(!a.player.intent.right);
    }

    #[test]
    fn test_shoot_spawns_bullet() {
        let mut a = app();
        a.apply_input(
            Actions {
                shoot: true,
                ..Actions::default()
            },
            DirectionInput::default(),
        );
        assert_eq!(a.bullets.len(), 1);
    }

    #[test]
    fn test_direction_reaches_player_and_moves_it() {
        let mut a = app();
        a.apply_input(
            Actions::default(),
            DirectionInput {
                right: true,
                left: false,
                axis: 1.0,
            },
        );
        let x_before = a.player.body.pos.x;
        for _ in 0..10 {
            a.update(1.0);
        }
        assert!(a.player.body.pos.x > x_before);
    }

    #[test]
    fn test_player_lands_on_builtin_floor() {
        let mut a = app();
        let mut ticks = 0;
        while !a.player.body.collisions.bottom {
            a.update(1.0);
            ticks += 1;
            assert!(ticks < 300, "player never landed");
        }
        assert_eq!(a.player.body.rect.bottom(), 100);
    }

    #[test]
    fn test_camera_follows_player_fall() {
        let mut a = app();
        let scroll_before = a.camera.true_scroll;
        for _ in 0..60 {
            a.update(1.0);
        }
        assert_ne!(a.camera.true_scroll, scroll_before);
    }
}
