use serde::{Deserialize, Serialize};

use sidescroll_core::geometry::{Direction, Rect, step};
use sidescroll_core::time::elapsed;

use crate::entity::Sprite;
use crate::physics::SCREEN_HEIGHT;

/// Horizontal walking speed of every enemy.
pub const ENEMY_SPEED: f32 = 2.0;
/// Speed of a kicked shell.
pub const SHELL_SPEED: f32 = 10.0;
const ENEMY_GRAVITY: f32 = 1.5;
const ENEMY_MAX_FALL: f32 = 10.0;
const DEATH_JUMP_GRAVITY: f32 = 0.5;
const WALK_FRAME_MS: u64 = 125;
/// How long a squashed goomba stays on screen.
pub const SQUASH_MS: u64 = 500;

const FRAME_SQUASHED: usize = 2;
const FRAME_FLIPPED: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Goomba,
    Koopa,
}

impl EnemyKind {
    fn dimensions(self) -> (i32, i32) {
        match self {
            EnemyKind::Goomba => (40, 40),
            EnemyKind::Koopa => (40, 60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Walk,
    Fall,
    JumpedOn,
    ShellSlide,
    DeathJump,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub rect: Rect,
    pub x_vel: f32,
    pub y_vel: f32,
    pub direction: Direction,
    pub state: EnemyState,
    pub gravity: f32,
    pub frame_index: usize,
    pub animate_timer: u64,
    pub death_timer: Option<u64>,
}

impl Enemy {
    /// Walking enemy with its bottom-left corner at (`x`, `bottom`).
    pub fn new(kind: EnemyKind, x: i32, bottom: i32, direction: Direction, now: u64) -> Self {
        let (w, h) = kind.dimensions();
        Self {
            kind,
            rect: Rect::with_bottom(x, bottom, w, h),
            x_vel: ENEMY_SPEED * direction.sign(),
            y_vel: 0.0,
            direction,
            state: EnemyState::Walk,
            gravity: ENEMY_GRAVITY,
            frame_index: 0,
            animate_timer: now,
            death_timer: None,
        }
    }

    pub fn goomba(x: i32, bottom: i32, direction: Direction, now: u64) -> Self {
        Self::new(EnemyKind::Goomba, x, bottom, direction, now)
    }

    pub fn koopa(x: i32, bottom: i32, direction: Direction, now: u64) -> Self {
        Self::new(EnemyKind::Koopa, x, bottom, direction, now)
    }

    /// Walk in `direction` at the normal enemy speed.
    pub fn set_velocity(&mut self) {
        self.x_vel = ENEMY_SPEED * self.direction.sign();
    }

    /// Advance the enemy's own state machine. Returns `false` once it should
    /// be removed from its group.
    pub fn update(&mut self, now: u64) -> bool {
        match self.state {
            EnemyState::Walk => {
                if elapsed(now, self.animate_timer) > WALK_FRAME_MS {
                    self.frame_index = if self.frame_index == 0 { 1 } else { 0 };
                    self.animate_timer = now;
                }
                true
            },
            EnemyState::Fall => {
                if self.y_vel < ENEMY_MAX_FALL {
                    self.y_vel += self.gravity;
                }
                true
            },
            EnemyState::JumpedOn => self.jumped_on(now),
            EnemyState::ShellSlide => {
                self.x_vel = SHELL_SPEED * self.direction.sign();
                true
            },
            EnemyState::DeathJump => {
                self.rect.y = step(self.rect.y, self.y_vel);
                self.rect.x = step(self.rect.x, self.x_vel);
                self.y_vel += self.gravity;
                self.rect.y <= SCREEN_HEIGHT
            },
        }
    }

    fn jumped_on(&mut self, now: u64) -> bool {
        self.frame_index = FRAME_SQUASHED;
        match self.kind {
            EnemyKind::Goomba => {
                let since = *self.death_timer.get_or_insert(now);
                elapsed(now, since) <= SQUASH_MS
            },
            EnemyKind::Koopa => {
                self.x_vel = 0.0;
                true
            },
        }
    }

    /// Stomped from above. Goombas squash; koopas retract into a shell,
    /// shrinking the hitbox around the same bottom-left corner.
    pub fn stomp(&mut self, now: u64) {
        self.state = EnemyState::JumpedOn;
        self.frame_index = FRAME_SQUASHED;
        match self.kind {
            EnemyKind::Goomba => self.death_timer = Some(now),
            EnemyKind::Koopa => {
                self.x_vel = 0.0;
                self.rect.resize_anchored(40, 35);
            },
        }
    }

    /// Send a shell sliding in `direction`.
    pub fn kick(&mut self, direction: Direction) {
        self.direction = direction;
        self.state = EnemyState::ShellSlide;
        self.x_vel = SHELL_SPEED * direction.sign();
    }

    /// Flip over and fall off the screen, drifting towards `direction`.
    pub fn start_death_jump(&mut self, direction: Direction) {
        self.y_vel = -8.0;
        self.x_vel = ENEMY_SPEED * direction.sign();
        self.gravity = DEATH_JUMP_GRAVITY;
        self.frame_index = FRAME_FLIPPED;
        self.state = EnemyState::DeathJump;
    }

    /// Reverse travel direction after hitting something.
    pub fn turn_around(&mut self) {
        self.direction = self.direction.opposite();
        self.set_velocity();
    }
}

impl Sprite for Enemy {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn atlas(&self) -> &'static str {
        match self.kind {
            EnemyKind::Goomba => "goomba",
            EnemyKind::Koopa => "koopa",
        }
    }

    fn frame(&self) -> usize {
        self.frame_index
    }
}
