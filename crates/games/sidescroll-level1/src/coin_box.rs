use serde::{Deserialize, Serialize};

use sidescroll_core::events::{EventQueue, SoundEffect};
use sidescroll_core::geometry::{Rect, step};
use sidescroll_core::time::elapsed;

use crate::bricks::{BLOCK_GRAVITY, BLOCK_SIZE, BUMP_VEL, BlockState};
use crate::coin::Coin;
use crate::contents::{Contents, Spawn};
use crate::entity::Sprite;

const FLASH_HOLD_MS: u64 = 375;
const FLASH_STEP_MS: u64 = 125;
const FRAME_USED: usize = 3;

/// Question block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinBox {
    pub rect: Rect,
    pub rest_height: i32,
    pub y_vel: f32,
    pub gravity: f32,
    pub state: BlockState,
    pub contents: Contents,
    pub frame_index: usize,
    /// True while the flash runs 0 -> 1 -> 2, false on the way back.
    pub first_half: bool,
    pub animation_timer: u64,
}

impl CoinBox {
    pub fn new(x: i32, y: i32, contents: Contents) -> Self {
        Self {
            rect: Rect::new(x, y, BLOCK_SIZE, BLOCK_SIZE),
            rest_height: y,
            y_vel: 0.0,
            gravity: BLOCK_GRAVITY,
            state: BlockState::Resting,
            contents,
            frame_index: 0,
            first_half: true,
            animation_timer: 0,
        }
    }

    pub fn update(&mut self, now: u64) -> Option<Spawn> {
        match self.state {
            BlockState::Resting => {
                self.resting(now);
                None
            },
            BlockState::Bumped => self.bumped(now),
            BlockState::Opened => None,
        }
    }

    fn resting(&mut self, now: u64) {
        let since = elapsed(now, self.animation_timer);
        if self.first_half {
            match self.frame_index {
                0 if since > FLASH_HOLD_MS => self.flash_to(1, now),
                1 if since > FLASH_STEP_MS => self.flash_to(2, now),
                2 if since > FLASH_STEP_MS => {
                    self.flash_to(1, now);
                    self.first_half = false;
                },
                _ => {},
            }
        } else if self.frame_index == 1 && since > FLASH_STEP_MS {
            self.flash_to(0, now);
            self.first_half = true;
        }
    }

    fn flash_to(&mut self, frame: usize, now: u64) {
        self.frame_index = frame;
        self.animation_timer = now;
    }

    fn bumped(&mut self, now: u64) -> Option<Spawn> {
        self.rect.y = step(self.rect.y, self.y_vel);
        self.y_vel += self.gravity;
        self.frame_index = FRAME_USED;
        if self.rect.y > self.rest_height + 5 {
            self.rect.y = self.rest_height;
            self.state = BlockState::Opened;
            return self
                .contents
                .powerup(self.rect.centerx(), self.rect.y, now)
                .map(Spawn::Powerup);
        }
        None
    }

    /// Hit from below. Coins pop out at once; items appear when the box
    /// settles.
    pub fn start_bump(&mut self, now: u64, events: &mut EventQueue) -> Option<Spawn> {
        self.y_vel = BUMP_VEL;
        self.state = BlockState::Bumped;
        self.frame_index = FRAME_USED;
        if self.contents == Contents::Coin {
            events.sound(SoundEffect::Coin);
            Some(Spawn::Coin(Coin::new(self.rect.centerx(), self.rect.y, now)))
        } else {
            events.sound(SoundEffect::PowerupAppears);
            None
        }
    }
}

impl Sprite for CoinBox {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn atlas(&self) -> &'static str {
        "coin_box"
    }

    fn frame(&self) -> usize {
        self.frame_index
    }
}
