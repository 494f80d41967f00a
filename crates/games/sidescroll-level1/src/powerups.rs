use serde::{Deserialize, Serialize};

use sidescroll_core::geometry::{Direction, Rect, step};
use sidescroll_core::time::elapsed;

use crate::collision::Solids;
use crate::entity::Sprite;

/// Items that come out of blocks, plus the player's fireballs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Mushroom,
    LifeMushroom,
    FireFlower,
    Star,
    FireBall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupState {
    /// Rising out of the block it was spawned from.
    Reveal,
    Slide,
    Fall,
    Bounce,
    Resting,
    Flying,
    Bouncing,
    Exploding,
}

const MUSHROOM_SPEED: f32 = 3.0;
const STAR_SPEED: f32 = 5.0;
const FIREBALL_SPEED: f32 = 12.0;
const FIREBALL_BOUNCE_SPEED: f32 = 15.0;
const FIREBALL_DROP: f32 = 10.0;
const FIREBALL_GRAVITY: f32 = 0.9;
const STAR_GRAVITY: f32 = 0.4;
const ITEM_GRAVITY: f32 = 1.0;
const ITEM_MAX_Y_VEL: f32 = 8.0;

const FIREBALL_FRAME_MS: u64 = 200;
const EXPLOSION_FRAME_MS: u64 = 50;
const SPARKLE_FRAME_MS: u64 = 30;
const EXPLOSION_FIRST: usize = 4;
const EXPLOSION_LAST: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub rect: Rect,
    pub x_vel: f32,
    pub y_vel: f32,
    pub direction: Direction,
    pub state: PowerupState,
    /// Top of the block the item rose from.
    pub box_height: i32,
    pub gravity: f32,
    pub max_y_vel: f32,
    pub frame_index: usize,
    pub animate_timer: u64,
}

impl Powerup {
    fn from_block(kind: PowerupKind, centerx: i32, box_y: i32, now: u64) -> Self {
        let mut rect = Rect::new(0, box_y - 5, 40, 40);
        rect.set_centerx(centerx);
        Self {
            kind,
            rect,
            x_vel: 0.0,
            y_vel: -1.0,
            direction: Direction::Right,
            state: PowerupState::Reveal,
            box_height: box_y,
            gravity: ITEM_GRAVITY,
            max_y_vel: ITEM_MAX_Y_VEL,
            frame_index: 0,
            animate_timer: now,
        }
    }

    pub fn mushroom(centerx: i32, box_y: i32, now: u64) -> Self {
        Self::from_block(PowerupKind::Mushroom, centerx, box_y, now)
    }

    pub fn life_mushroom(centerx: i32, box_y: i32, now: u64) -> Self {
        Self::from_block(PowerupKind::LifeMushroom, centerx, box_y, now)
    }

    pub fn fire_flower(centerx: i32, box_y: i32, now: u64) -> Self {
        Self::from_block(PowerupKind::FireFlower, centerx, box_y, now)
    }

    pub fn star(centerx: i32, box_y: i32, now: u64) -> Self {
        Self {
            gravity: STAR_GRAVITY,
            ..Self::from_block(PowerupKind::Star, centerx, box_y, now)
        }
    }

    /// Fireball leaving the player's hand; `right` is the player's right edge.
    pub fn fireball(right: i32, y: i32, facing: Direction, now: u64) -> Self {
        let mut rect = Rect::new(0, y, 20, 20);
        rect.set_right(right);
        Self {
            kind: PowerupKind::FireBall,
            rect,
            x_vel: FIREBALL_SPEED * facing.sign(),
            y_vel: FIREBALL_DROP,
            direction: facing,
            state: PowerupState::Flying,
            box_height: 0,
            gravity: FIREBALL_GRAVITY,
            max_y_vel: FIREBALL_DROP,
            frame_index: 0,
            animate_timer: now,
        }
    }

    pub fn is_fireball(&self) -> bool {
        self.kind == PowerupKind::FireBall
    }

    /// Fireball that can still hit things.
    pub fn is_live_fireball(&self) -> bool {
        self.is_fireball() && self.state != PowerupState::Exploding
    }

    /// Advance the item's own state machine. Returns `false` once the item
    /// should be removed.
    pub fn update(&mut self, now: u64, viewport: &Rect) -> bool {
        match self.kind {
            PowerupKind::Mushroom | PowerupKind::LifeMushroom => {
                match self.state {
                    PowerupState::Reveal => {
                        if self.reveal() {
                            self.state = PowerupState::Slide;
                        }
                    },
                    PowerupState::Slide => self.x_vel = MUSHROOM_SPEED * self.direction.sign(),
                    PowerupState::Fall => {
                        if self.y_vel < self.max_y_vel {
                            self.y_vel += self.gravity;
                        }
                    },
                    _ => {},
                }
                true
            },
            PowerupKind::FireFlower => {
                if self.state == PowerupState::Reveal && self.reveal() {
                    self.state = PowerupState::Resting;
                }
                self.sparkle(now);
                true
            },
            PowerupKind::Star => {
                match self.state {
                    PowerupState::Reveal => {
                        if self.reveal() {
                            self.start_bounce(-2.0);
                        }
                    },
                    PowerupState::Bounce => self.x_vel = STAR_SPEED * self.direction.sign(),
                    _ => {},
                }
                self.sparkle(now);
                true
            },
            PowerupKind::FireBall => self.update_fireball(now, viewport),
        }
    }

    /// Rise until the item clears the block top. Returns true when done.
    fn reveal(&mut self) -> bool {
        self.rect.y = step(self.rect.y, self.y_vel);
        if self.rect.bottom() <= self.box_height {
            self.rect.set_bottom(self.box_height);
            self.y_vel = 0.0;
            true
        } else {
            false
        }
    }

    fn sparkle(&mut self, now: u64) {
        if elapsed(now, self.animate_timer) > SPARKLE_FRAME_MS {
            self.frame_index = (self.frame_index + 1) % 4;
            self.animate_timer = now;
        }
    }

    pub fn start_bounce(&mut self, vel: f32) {
        self.y_vel = vel;
        self.state = PowerupState::Bounce;
    }

    fn update_fireball(&mut self, now: u64, viewport: &Rect) -> bool {
        match self.state {
            PowerupState::Flying | PowerupState::Bouncing => {
                if elapsed(now, self.animate_timer) > FIREBALL_FRAME_MS {
                    self.frame_index = (self.frame_index + 1) % 4;
                    self.animate_timer = now;
                }
            },
            PowerupState::Exploding => {
                if elapsed(now, self.animate_timer) > EXPLOSION_FRAME_MS {
                    if self.frame_index >= EXPLOSION_LAST {
                        return false;
                    }
                    self.frame_index += 1;
                    self.animate_timer = now;
                }
            },
            _ => {},
        }
        !self.fireball_off_screen(viewport)
    }

    fn fireball_off_screen(&self, viewport: &Rect) -> bool {
        self.rect.x > viewport.right()
            || self.rect.y > viewport.bottom()
            || self.rect.right() < viewport.x
    }

    /// Switch a fireball to its explosion animation.
    pub fn explode(&mut self, now: u64) {
        let centerx = self.rect.centerx();
        self.frame_index = EXPLOSION_FIRST;
        self.rect.set_centerx(centerx);
        self.x_vel = 0.0;
        self.y_vel = 0.0;
        self.state = PowerupState::Exploding;
        self.animate_timer = now;
    }

    fn bounce_fireball(&mut self) {
        self.y_vel = -8.0;
        self.x_vel = FIREBALL_BOUNCE_SPEED * self.direction.sign();
        self.state = PowerupState::Bouncing;
    }

    // ================================================================
    // Movement against terrain
    // ================================================================

    /// Slide or fall a mushroom, reversing on walls.
    pub fn adjust_mushroom(&mut self, solids: &Solids) {
        if self.state == PowerupState::Reveal {
            return;
        }
        self.rect.x = step(self.rect.x, self.x_vel);
        if let Some(wall) = solids.first_hit(&self.rect) {
            self.bounce_off_wall(&wall);
        }

        self.rect.y = step(self.rect.y, self.y_vel);
        if let Some(floor) = solids.first_hit(&self.rect) {
            self.rect.set_bottom(floor.top());
            self.y_vel = 0.0;
            self.state = PowerupState::Slide;
        } else if !solids.supports(&self.rect) {
            self.state = PowerupState::Fall;
        }
    }

    fn bounce_off_wall(&mut self, wall: &Rect) {
        if self.rect.x > wall.x {
            self.rect.set_left(wall.right());
            self.direction = Direction::Right;
        } else {
            self.rect.set_right(wall.left());
            self.direction = Direction::Left;
        }
    }

    /// Bounce a star across terrain.
    pub fn adjust_star(&mut self, solids: &Solids) {
        if self.state != PowerupState::Bounce {
            return;
        }
        self.rect.x = step(self.rect.x, self.x_vel);
        if let Some(wall) = solids.first_hit(&self.rect) {
            self.bounce_off_wall(&wall);
        }

        self.rect.y = step(self.rect.y, self.y_vel);
        if let Some(block) = solids.first_hit(&self.rect) {
            if self.rect.y > block.y {
                self.rect.set_top(block.bottom());
                self.y_vel = 0.0;
            } else {
                self.rect.set_bottom(block.top());
                self.start_bounce(-8.0);
            }
        }
        self.y_vel += self.gravity;
    }

    /// Move a fireball and resolve terrain contact. Hits against enemies are
    /// handled by the level, which owns them.
    pub fn adjust_fireball(&mut self, solids: &Solids, now: u64) {
        if !matches!(self.state, PowerupState::Flying | PowerupState::Bouncing) {
            return;
        }
        self.rect.x = step(self.rect.x, self.x_vel);
        if solids.overlaps(&self.rect) {
            self.explode(now);
            return;
        }

        self.rect.y = step(self.rect.y, self.y_vel);
        if let Some(floor) = solids.first_hit(&self.rect) {
            self.rect.set_bottom(floor.top());
            self.bounce_fireball();
        }
        if self.state == PowerupState::Bouncing {
            self.y_vel += self.gravity;
        }
    }

    /// Generic off-screen test for items that left the playfield.
    pub fn is_off_screen(&self, viewport: &Rect) -> bool {
        self.rect.x < viewport.x - 300 || self.rect.y > viewport.bottom()
    }
}

impl Sprite for Powerup {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn atlas(&self) -> &'static str {
        match self.kind {
            PowerupKind::Mushroom => "mushroom",
            PowerupKind::LifeMushroom => "life_mushroom",
            PowerupKind::FireFlower => "fire_flower",
            PowerupKind::Star => "star",
            PowerupKind::FireBall => "fireball",
        }
    }

    fn frame(&self) -> usize {
        self.frame_index
    }
}
