//! End-of-level goal: the flag and pole, and the flag that rises over the
//! castle once the player is inside.

use serde::{Deserialize, Serialize};

use sidescroll_core::geometry::Rect;

use crate::entity::Sprite;

/// Bottom edge at which the sliding flag stops.
pub const FLAG_REST_BOTTOM: i32 = 485;
const FLAG_SLIDE_SPEED: i32 = 5;
const CASTLE_FLAG_RISE: i32 = -2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagState {
    TopOfPole,
    SlideDown,
    BottomOfPole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub rect: Rect,
    pub y_vel: i32,
    pub state: FlagState,
}

impl Flag {
    /// Flag whose right edge touches the pole at `right`.
    pub fn new(right: i32, y: i32) -> Self {
        let mut rect = Rect::new(0, y, 40, 40);
        rect.set_right(right);
        Self {
            rect,
            y_vel: 0,
            state: FlagState::TopOfPole,
        }
    }

    pub fn start_sliding(&mut self) {
        self.state = FlagState::SlideDown;
    }

    pub fn update(&mut self) {
        if self.state == FlagState::SlideDown {
            self.y_vel = FLAG_SLIDE_SPEED;
            self.rect.y += self.y_vel;
            if self.rect.bottom() >= FLAG_REST_BOTTOM {
                self.state = FlagState::BottomOfPole;
            }
        }
    }
}

impl Sprite for Flag {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn atlas(&self) -> &'static str {
        "flag"
    }

    fn frame(&self) -> usize {
        0
    }
}

/// One 40 px segment of the pole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pole {
    pub rect: Rect,
}

impl Pole {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            rect: Rect::new(x, y, 5, 40),
        }
    }
}

impl Sprite for Pole {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn atlas(&self) -> &'static str {
        "pole"
    }

    fn frame(&self) -> usize {
        0
    }
}

/// Ball on top of the pole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finial {
    pub rect: Rect,
}

impl Finial {
    pub fn new(centerx: i32, bottom: i32) -> Self {
        let mut rect = Rect::with_bottom(0, bottom, 20, 20);
        rect.set_centerx(centerx);
        Self { rect }
    }
}

impl Sprite for Finial {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn atlas(&self) -> &'static str {
        "finial"
    }

    fn frame(&self) -> usize {
        0
    }
}

/// Everything that makes up the flag pole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagPole {
    pub flag: Flag,
    pub poles: Vec<Pole>,
    pub finial: Finial,
}

impl FlagPole {
    /// Pole at `x` built from segments starting at each of `segment_tops`,
    /// with the flag hanging just left of it.
    pub fn new(x: i32, flag_y: i32, segment_tops: &[i32], finial_bottom: i32) -> Self {
        Self {
            flag: Flag::new(x, flag_y),
            poles: segment_tops.iter().map(|&y| Pole::new(x, y)).collect(),
            finial: Finial::new(x + 2, finial_bottom),
        }
    }

    pub fn update(&mut self) {
        self.flag.update();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastleFlagState {
    Rising,
    Resting,
}

/// Flag that rises above the castle after the player walks in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastleFlag {
    pub rect: Rect,
    pub y_vel: i32,
    pub target_height: i32,
    pub state: CastleFlagState,
}

impl CastleFlag {
    /// Flag hidden behind the castle at (`x`, `y`); it rises until its
    /// bottom edge reaches `y`.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            rect: Rect::new(x, y, 35, 35),
            y_vel: CASTLE_FLAG_RISE,
            target_height: y,
            state: CastleFlagState::Rising,
        }
    }

    pub fn update(&mut self) {
        if self.state == CastleFlagState::Rising {
            self.rect.y += self.y_vel;
            if self.rect.bottom() <= self.target_height {
                self.state = CastleFlagState::Resting;
            }
        }
    }
}

impl Sprite for CastleFlag {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn atlas(&self) -> &'static str {
        "castle_flag"
    }

    fn frame(&self) -> usize {
        0
    }
}
