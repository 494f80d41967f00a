use serde::{Deserialize, Serialize};

use sidescroll_core::geometry::{Rect, step};
use sidescroll_core::time::elapsed;

use crate::entity::Sprite;
use crate::score::Score;

const COIN_LAUNCH_VEL: f32 = -15.0;
const COIN_GRAVITY: f32 = 1.0;
const SPIN_FRAME_MS: u64 = 80;
/// Points for a coin popped out of a block.
pub const COIN_POINTS: u32 = 200;

/// Coin that pops out of a block, spins, and turns into a floating score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub rect: Rect,
    pub y_vel: f32,
    pub gravity: f32,
    /// Bottom edge below which the coin has landed.
    pub initial_height: i32,
    pub frame_index: usize,
    pub animation_timer: u64,
}

impl Coin {
    /// Coin launched from the top of a block centred on `x` with top `y`.
    pub fn new(x: i32, y: i32, now: u64) -> Self {
        let mut rect = Rect::with_bottom(0, y - 5, 20, 35);
        rect.set_centerx(x);
        Self {
            initial_height: rect.bottom() - 5,
            rect,
            y_vel: COIN_LAUNCH_VEL,
            gravity: COIN_GRAVITY,
            frame_index: 0,
            animation_timer: now,
        }
    }

    /// Spin one frame. Once the coin drops back past its launch height it
    /// is done and yields the floating score to show, in screen space.
    pub fn update(&mut self, now: u64, viewport: &Rect) -> Option<Score> {
        self.rect.y = step(self.rect.y, self.y_vel);
        self.y_vel += self.gravity;
        if elapsed(now, self.animation_timer) > SPIN_FRAME_MS {
            self.frame_index = (self.frame_index + 1) % 4;
            self.animation_timer = now;
        }
        if self.rect.bottom() > self.initial_height {
            Some(Score::points(
                self.rect.centerx() - viewport.x,
                self.rect.y,
                COIN_POINTS,
            ))
        } else {
            None
        }
    }
}

impl Sprite for Coin {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn atlas(&self) -> &'static str {
        "coin"
    }

    fn frame(&self) -> usize {
        self.frame_index
    }
}
