use serde::{Deserialize, Serialize};

use sidescroll_core::events::{EventQueue, SoundEffect};
use sidescroll_core::geometry::{Rect, step};

use crate::coin::Coin;
use crate::contents::{Contents, Spawn};
use crate::entity::Sprite;
use crate::physics::SCREEN_HEIGHT;

/// Side length of a brick or coin box.
pub const BLOCK_SIZE: i32 = 43;
/// Upward kick given to a block hit from below.
pub const BUMP_VEL: f32 = -6.0;
pub const BLOCK_GRAVITY: f32 = 1.2;
const SIX_COINS: u32 = 6;
const PIECE_GRAVITY: f32 = 0.8;
const PIECE_SIZE: i32 = 21;

/// Shared state machine of bricks and coin boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockState {
    Resting,
    Bumped,
    Opened,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub rest_height: i32,
    pub y_vel: f32,
    pub gravity: f32,
    pub state: BlockState,
    pub contents: Contents,
    pub coin_total: u32,
    pub powerup_in_box: bool,
    pub frame_index: usize,
}

impl Brick {
    pub fn new(x: i32, y: i32, contents: Contents) -> Self {
        Self {
            rect: Rect::new(x, y, BLOCK_SIZE, BLOCK_SIZE),
            rest_height: y,
            y_vel: 0.0,
            gravity: BLOCK_GRAVITY,
            state: BlockState::Resting,
            contents,
            coin_total: if contents == Contents::SixCoins {
                SIX_COINS
            } else {
                0
            },
            powerup_in_box: true,
            frame_index: 0,
        }
    }

    /// Whether the brick holds anything at all; only empty bricks can be
    /// smashed.
    pub fn is_plain(&self) -> bool {
        self.contents == Contents::Empty
    }

    pub fn update(&mut self, now: u64) -> Option<Spawn> {
        match self.state {
            BlockState::Resting => {
                if self.contents == Contents::SixCoins && self.coin_total == 0 {
                    self.state = BlockState::Opened;
                }
                None
            },
            BlockState::Bumped => {
                self.bumped();
                None
            },
            BlockState::Opened => self.opened(now),
        }
    }

    fn bumped(&mut self) {
        self.rect.y = step(self.rect.y, self.y_vel);
        self.y_vel += self.gravity;
        if self.rect.y >= self.rest_height + 5 {
            self.rect.y = self.rest_height;
            self.state = match self.contents {
                Contents::SixCoins if self.coin_total > 0 => BlockState::Resting,
                Contents::SixCoins | Contents::Star | Contents::Mushroom | Contents::FireFlower => {
                    BlockState::Opened
                },
                _ => BlockState::Resting,
            };
        }
    }

    fn opened(&mut self, now: u64) -> Option<Spawn> {
        self.frame_index = 1;
        if self.powerup_in_box {
            let item = self
                .contents
                .powerup(self.rect.centerx(), self.rest_height, now);
            if item.is_some() {
                self.powerup_in_box = false;
            }
            return item.map(Spawn::Powerup);
        }
        None
    }

    /// Hit from below. Six-coin bricks pay out a coin per bump; item bricks
    /// announce the item, which appears once the brick settles.
    pub fn start_bump(&mut self, now: u64, events: &mut EventQueue) -> Option<Spawn> {
        self.y_vel = BUMP_VEL;
        let mut spawn = None;
        match self.contents {
            Contents::SixCoins => {
                events.sound(SoundEffect::Coin);
                if self.coin_total > 0 {
                    spawn = Some(Spawn::Coin(Coin::new(self.rect.centerx(), self.rect.y, now)));
                    self.coin_total -= 1;
                    if self.coin_total == 0 {
                        self.frame_index = 1;
                    }
                }
            },
            Contents::Star | Contents::Mushroom | Contents::FireFlower => {
                events.sound(SoundEffect::PowerupAppears);
                self.frame_index = 1;
            },
            _ => {},
        }
        self.state = BlockState::Bumped;
        spawn
    }

    /// The four pieces a smashed brick breaks into.
    pub fn smash(&self) -> [BrickPiece; 4] {
        let r = self.rect;
        let upper = r.y - r.h / 2;
        [
            BrickPiece::new(r.x, upper, -2.0, -12.0),
            BrickPiece::new(r.right(), upper, 2.0, -12.0),
            BrickPiece::new(r.x, r.y, -2.0, -6.0),
            BrickPiece::new(r.right(), r.y, 2.0, -6.0),
        ]
    }
}

impl Sprite for Brick {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn atlas(&self) -> &'static str {
        "brick"
    }

    fn frame(&self) -> usize {
        self.frame_index
    }
}

/// Debris flying out of a smashed brick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickPiece {
    pub rect: Rect,
    pub x_vel: f32,
    pub y_vel: f32,
    pub gravity: f32,
}

impl BrickPiece {
    pub fn new(x: i32, y: i32, x_vel: f32, y_vel: f32) -> Self {
        Self {
            rect: Rect::new(x, y, PIECE_SIZE, PIECE_SIZE),
            x_vel,
            y_vel,
            gravity: PIECE_GRAVITY,
        }
    }

    /// Returns `false` once the piece has fallen off the screen.
    pub fn update(&mut self) -> bool {
        self.rect.x = step(self.rect.x, self.x_vel);
        self.rect.y = step(self.rect.y, self.y_vel);
        self.y_vel += self.gravity;
        self.rect.y <= SCREEN_HEIGHT
    }
}

impl Sprite for BrickPiece {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn atlas(&self) -> &'static str {
        "brick_piece"
    }

    fn frame(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(brick: &mut Brick) {
        for t in 0..100 {
            if brick.state != BlockState::Bumped {
                break;
            }
            brick.update(t * 16);
        }
    }

    // ================================================================
    // Bumping
    // ================================================================

    #[test]
    fn six_coin_brick_starts_full() {
        let brick = Brick::new(50, 50, Contents::SixCoins);
        assert_eq!(brick.coin_total, 6);
        assert_eq!(brick.state, BlockState::Resting);
        assert_eq!((brick.rect.x, brick.rect.y), (50, 50));
    }

    #[test]
    fn six_coin_brick_pays_out_then_opens() {
        let mut brick = Brick::new(4030, 365, Contents::SixCoins);
        let mut events = EventQueue::new();
        let mut coins = 0;
        for bump in 0..6 {
            assert_ne!(brick.state, BlockState::Opened, "bump {bump}");
            if let Some(Spawn::Coin(_)) = brick.start_bump(0, &mut events) {
                coins += 1;
            }
            settle(&mut brick);
        }
        assert_eq!(coins, 6);
        assert_eq!(brick.coin_total, 0);
        assert_eq!(brick.state, BlockState::Opened);
        assert_eq!(brick.rect.y, 365);
        assert!(events.contains_sound(SoundEffect::Coin));
    }

    #[test]
    fn empty_six_coin_brick_bump_spawns_nothing() {
        let mut brick = Brick::new(0, 0, Contents::SixCoins);
        brick.coin_total = 0;
        let mut events = EventQueue::new();
        assert!(brick.start_bump(0, &mut events).is_none());
        assert_eq!(brick.state, BlockState::Bumped);
        assert_eq!(brick.y_vel, BUMP_VEL);
    }

    #[test]
    fn last_coin_shows_used_frame() {
        let mut brick = Brick::new(0, 0, Contents::SixCoins);
        brick.coin_total = 1;
        let mut events = EventQueue::new();
        assert!(brick.start_bump(0, &mut events).is_some());
        assert_eq!(brick.coin_total, 0);
        assert_eq!(brick.frame_index, 1);
    }

    #[test]
    fn settle_returns_to_rest_height() {
        let mut brick = Brick::new(50, 50, Contents::Empty);
        brick.state = BlockState::Bumped;
        brick.rect.y = brick.rest_height + 10;
        brick.update(0);
        assert_eq!(brick.rect.y, brick.rest_height);
        assert_eq!(brick.state, BlockState::Resting);
    }

    #[test]
    fn star_brick_opens_and_releases_once() {
        let mut brick = Brick::new(4330, 365, Contents::Star);
        let mut events = EventQueue::new();
        brick.start_bump(0, &mut events);
        assert_eq!(brick.frame_index, 1);
        assert!(events.contains_sound(SoundEffect::PowerupAppears));
        settle(&mut brick);
        assert_eq!(brick.state, BlockState::Opened);

        let first = brick.update(500);
        assert!(matches!(first, Some(Spawn::Powerup(ref p)) if p.kind == crate::powerups::PowerupKind::Star));
        assert!(!brick.powerup_in_box);
        assert!(brick.update(516).is_none());
    }

    // ================================================================
    // Smashing
    // ================================================================

    #[test]
    fn smash_makes_four_pieces() {
        let brick = Brick::new(100, 200, Contents::Empty);
        let pieces = brick.smash();
        assert_eq!((pieces[0].rect.x, pieces[0].rect.y), (100, 179));
        assert_eq!((pieces[1].rect.x, pieces[1].x_vel), (143, 2.0));
        assert_eq!((pieces[2].y_vel, pieces[3].y_vel), (-6.0, -6.0));
        assert!(pieces.iter().all(|p| p.gravity == 0.8));
    }

    #[test]
    fn piece_moves_then_falls_away() {
        let mut piece = BrickPiece::new(100, 100, 2.0, -4.0);
        assert!(piece.update());
        assert_eq!((piece.rect.x, piece.rect.y), (102, 96));
        let mut frames = 0;
        while piece.update() {
            frames += 1;
            assert!(frames < 200);
        }
        assert!(piece.rect.y > SCREEN_HEIGHT);
    }
}
