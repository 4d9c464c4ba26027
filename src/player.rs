//! Player movement state machine
//!
//! Momentum-driven run/jump/double-jump/dash controller on top of the
//! kinematic body. Momentum is in distance-per-tick units and gets scaled
//! by the normalized tick delta on the way into `move_by`; the air timer
//! and dash cooldown advance by whole ticks per update call.

use macroquad::prelude::{ivec2, IVec2, Vec2};

use crate::physics::{KinematicBody, TileRect};

/// Vertical momentum left after a collision reset. Kept slightly positive
/// so the body stays pressed into the surface and the flag re-fires next
/// tick instead of flickering.
const REST_MOMENTUM: f32 = 0.1;

/// A dash ends once horizontal momentum has decayed into this absolute
/// band. Fixed value, not derived from the momentum cap.
const DASH_END_BAND: f32 = 3.0;

/// Air ticks after which the animation switches to the jump pose. Longer
/// than the coyote grace so walking off a ledge doesn't flash it.
const JUMP_POSE_AIR_TICKS: u32 = 12;

/// Idle drift below this is zeroed so the player doesn't creep forever.
const DRIFT_EPSILON: f32 = -0.0001;

/// Which way the player faces, for sprite flipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Horizontal direction intent, written by the input layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionIntent {
    pub left: bool,
    pub right: bool,
}

/// Animation-facing movement state, selected last-match-wins each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveAction {
    #[default]
    Idle,
    Run,
    Jump,
}

impl MoveAction {
    pub fn name(&self) -> &'static str {
        match self {
            MoveAction::Idle => "idle",
            MoveAction::Run => "run",
            MoveAction::Jump => "jump",
        }
    }
}

/// Dash burst state and its cooldown countdown.
///
/// The countdown only runs while `counting`; when it reaches zero it stops
/// counting and rearms at max, so the dash becomes usable one tick after
/// the countdown finishes, and only on a grounded tick.
#[derive(Debug, Clone, Copy)]
pub struct Dash {
    pub active: bool,
    pub available: bool,
    pub strength: f32,
    pub cooldown: u32,
    pub cooldown_max: u32,
    pub counting: bool,
}

impl Dash {
    pub fn new(strength: f32, cooldown_max: u32) -> Self {
        Self {
            active: false,
            available: true,
            strength,
            cooldown: cooldown_max,
            cooldown_max,
            counting: false,
        }
    }
}

/// The player controller: kinematic body plus the momentum/jump/dash
/// state machine.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: KinematicBody,
    pub momentum: Vec2,
    /// Per-axis acceleration applied per tick (x: run accel, y: gravity).
    pub strength: Vec2,
    /// Symmetric per-axis momentum clamp.
    pub cap: Vec2,
    pub jump_strength: f32,
    pub total_jumps: u32,
    pub current_jumps: u32,
    pub air_timer: u32,
    /// Coyote grace: jumps stay free while `air_timer` is below this.
    pub max_air_timer: u32,
    pub grounded: bool,
    pub dash: Dash,
    pub facing: Facing,
    pub intent: DirectionIntent,
    pub action: MoveAction,
}

impl Player {
    pub fn new(pos: Vec2, size: IVec2) -> Self {
        Self {
            body: KinematicBody::new(pos, size),
            momentum: Vec2::ZERO,
            strength: Vec2::new(0.5, 0.2),
            cap: Vec2::new(4.0, 5.0),
            jump_strength: -5.0,
            total_jumps: 2,
            current_jumps: 0,
            air_timer: 0,
            max_air_timer: 2,
            grounded: false,
            dash: Dash::new(4.2, 25),
            facing: Facing::default(),
            intent: DirectionIntent::default(),
            action: MoveAction::default(),
        }
    }

    /// Default player footprint.
    pub fn spawn(pos: Vec2) -> Self {
        Self::new(pos, ivec2(8, 13))
    }

    /// One simulation tick.
    ///
    /// `dt` is the normalized tick delta (1.0 at the target frame rate) and
    /// scales displacement only; accelerations, the air timer and the
    /// cooldown step in whole ticks. `axis_scale` is the analog stick
    /// magnitude (1.0 for keyboard).
    pub fn update(&mut self, tiles: &[TileRect], dt: f32, axis_scale: f32) {
        // Predictive grounded estimate; overwritten below once this tick's
        // bottom collision is known.
        self.grounded = self.air_timer < self.max_air_timer;

        // Cooldown: held at max until a dash starts it counting.
        if !self.dash.counting {
            self.dash.cooldown = self.dash.cooldown_max;
        } else if self.dash.cooldown == 0 {
            self.dash.counting = false;
            self.dash.cooldown = self.dash.cooldown_max;
        } else {
            self.dash.cooldown -= 1;
        }

        // Head bump: rest the momentum rather than zeroing it so the top
        // flag doesn't re-trigger.
        if self.body.collisions.top {
            self.momentum.y = REST_MOMENTUM;
        }

        if self.body.collisions.bottom {
            self.momentum.y = REST_MOMENTUM;
            self.air_timer = 0;
            self.current_jumps = 0;
            self.grounded = true;
            if !self.dash.counting {
                self.dash.available = true;
            }
        } else {
            self.momentum.y += self.strength.y;
            self.momentum.y = clamp_toward(self.momentum.y, self.cap.y);
            self.air_timer += 1;
            self.grounded = false;
        }

        // Horizontal intent; suspended while dashing.
        if !self.dash.active {
            if self.intent.right {
                self.momentum.x += self.strength.x * axis_scale;
                self.momentum.x = clamp_toward(self.momentum.x, self.cap.x);
                self.facing = Facing::Right;
            } else if self.intent.left {
                self.momentum.x -= self.strength.x * axis_scale;
                self.momentum.x = clamp_toward(self.momentum.x, -self.cap.x);
                self.facing = Facing::Left;
            } else if self.momentum.x < DRIFT_EPSILON {
                self.momentum.x = 0.0;
            }
        }

        // Friction: while dashing, or while no direction is held, decay by
        // one acceleration unit per tick. This is also what winds a dash
        // down.
        if self.dash.active || (!self.intent.left && !self.intent.right) {
            if self.momentum.x > 0.0 {
                self.momentum.x -= self.strength.x;
            } else if self.momentum.x < 0.0 {
                self.momentum.x += self.strength.x;
            }
        }

        if self.dash.active && self.momentum.x.abs() <= DASH_END_BAND {
            self.dash.active = false;
        }

        self.body.move_by(self.momentum * dt, tiles);

        self.action = if self.air_timer > JUMP_POSE_AIR_TICKS {
            MoveAction::Jump
        } else if self.intent.left || self.intent.right {
            MoveAction::Run
        } else {
            MoveAction::Idle
        };
    }

    /// Jump trigger (edge event from input).
    ///
    /// Two independent checks both write the jump velocity: the coyote
    /// grace and the jump budget. Only the budget branch spends a charge,
    /// so a jump inside the grace window is free unless the budget check
    /// also passes. Deliberately kept as two unconditional checks.
    pub fn jump(&mut self) {
        if self.air_timer < self.max_air_timer {
            self.momentum.y = self.jump_strength;
        }
        if self.current_jumps < self.total_jumps {
            self.momentum.y = self.jump_strength;
            self.current_jumps += 1;
        }
    }

    /// Dash trigger (edge event from input).
    ///
    /// Multiplies current horizontal momentum, so dashing from a standstill
    /// produces no burst. Starts the cooldown countdown immediately.
    pub fn dash(&mut self) {
        if self.dash.active || !self.dash.available || self.dash.counting {
            return;
        }
        self.momentum.x *= self.dash.strength;
        self.dash.active = true;
        self.dash.available = false;
        self.dash.counting = true;
    }
}

/// Clamp `value` toward a signed cap: positive caps bound from above,
/// negative caps from below.
fn clamp_toward(value: f32, cap: f32) -> f32 {
    if cap >= 0.0 {
        value.min(cap)
    } else {
        value.max(cap)
    }
}
