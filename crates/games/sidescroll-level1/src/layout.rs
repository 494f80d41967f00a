//! Static placement of everything in the level.
//!
//! World 1-1 ships built in via [`LevelLayout::world_1_1`]; alternative
//! layouts can be read from TOML with [`LevelLayout::from_toml`], which
//! rejects unknown block contents, misplaced contents and unknown
//! checkpoint ids before the level ever starts.

use serde::{Deserialize, Serialize};

use sidescroll_core::error::SceneError;
use sidescroll_core::geometry::Direction;

use crate::bricks::Brick;
use crate::checkpoint::{Checkpoint, CheckpointKind};
use crate::coin_box::CoinBox;
use crate::contents::Contents;
use crate::enemies::{Enemy, EnemyKind};
use crate::entity::Collider;
use crate::flagpole::{CastleFlag, FlagPole};
use crate::physics::{GROUND_HEIGHT, LEVEL_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Horizontal gap between enemies released by the same checkpoint.
pub const WAVE_SPACING: i32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectSpec {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

const fn solid(x: i32, y: i32, w: i32, h: i32) -> RectSpec {
    RectSpec { x, y, w, h }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub contents: Contents,
}

const fn block(x: i32, y: i32, contents: Contents) -> BlockSpec {
    BlockSpec { x, y, contents }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub kind: EnemyKind,
    #[serde(default = "default_enemy_bottom")]
    pub bottom: i32,
}

fn default_enemy_bottom() -> i32 {
    GROUND_HEIGHT
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSpec {
    pub id: CheckpointKind,
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default = "default_checkpoint_width")]
    pub w: i32,
    #[serde(default = "default_checkpoint_height")]
    pub h: i32,
}

fn default_checkpoint_width() -> i32 {
    10
}

fn default_checkpoint_height() -> i32 {
    SCREEN_HEIGHT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagPoleSpec {
    /// Left edge of the pole; the flag hangs with its right edge here.
    pub x: i32,
    pub flag_y: i32,
    pub segment_tops: Vec<i32>,
    pub finial_bottom: i32,
    pub castle_flag_x: i32,
    pub castle_flag_y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub width: i32,
    /// Ground segments, pipes and steps, in that order.
    pub colliders: Vec<RectSpec>,
    pub bricks: Vec<BlockSpec>,
    pub coin_boxes: Vec<BlockSpec>,
    pub flag_pole: FlagPoleSpec,
    /// Wave `n` is released by checkpoint `n`.
    pub enemy_waves: Vec<Vec<EnemySpec>>,
    pub checkpoints: Vec<CheckpointSpec>,
}

impl LevelLayout {
    /// Parse and validate a TOML layout.
    pub fn from_toml(src: &str) -> Result<Self, SceneError> {
        let layout: Self =
            toml::from_str(src).map_err(|e| SceneError::LayoutParse(e.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if self.width < SCREEN_WIDTH {
            return Err(SceneError::InvalidLayout(format!(
                "level width {} is narrower than the screen",
                self.width
            )));
        }
        let sizes = self.colliders.iter().map(|c| (c.w, c.h)).chain(
            self.checkpoints.iter().map(|c| (c.w, c.h)),
        );
        for (w, h) in sizes {
            if w <= 0 || h <= 0 {
                return Err(SceneError::InvalidLayout(format!(
                    "non-positive size {w}x{h}"
                )));
            }
        }
        for b in &self.bricks {
            if !b.contents.allowed_in_brick() {
                return Err(SceneError::InvalidLayout(format!(
                    "brick at ({}, {}) cannot hold '{}'",
                    b.x, b.y, b.contents
                )));
            }
        }
        for b in &self.coin_boxes {
            if !b.contents.allowed_in_coin_box() {
                return Err(SceneError::InvalidLayout(format!(
                    "coin box at ({}, {}) cannot hold '{}'",
                    b.x, b.y, b.contents
                )));
            }
        }
        for cp in &self.checkpoints {
            if let CheckpointKind::EnemyWave(n) = cp.id {
                let wave = usize::from(n)
                    .checked_sub(1)
                    .and_then(|i| self.enemy_waves.get(i));
                match wave {
                    None => {
                        return Err(SceneError::InvalidLayout(format!(
                            "checkpoint {n} has no enemy wave"
                        )));
                    }
                    Some(specs) if specs.is_empty() => {
                        return Err(SceneError::InvalidLayout(format!(
                            "enemy wave {n} is empty"
                        )));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    pub fn colliders(&self) -> Vec<Collider> {
        self.colliders
            .iter()
            .map(|c| Collider::new(c.x, c.y, c.w, c.h))
            .collect()
    }

    pub fn bricks(&self) -> Vec<Brick> {
        self.bricks
            .iter()
            .map(|b| Brick::new(b.x, b.y, b.contents))
            .collect()
    }

    pub fn coin_boxes(&self) -> Vec<CoinBox> {
        self.coin_boxes
            .iter()
            .map(|b| CoinBox::new(b.x, b.y, b.contents))
            .collect()
    }

    pub fn checkpoints(&self) -> Vec<Checkpoint> {
        self.checkpoints
            .iter()
            .map(|c| Checkpoint::new(c.id, c.x, c.y, c.w, c.h))
            .collect()
    }

    pub fn flag_pole(&self) -> FlagPole {
        let fp = &self.flag_pole;
        FlagPole::new(fp.x, fp.flag_y, &fp.segment_tops, fp.finial_bottom)
    }

    /// Castle flag, hidden until the player is inside.
    pub fn castle_flag(&self) -> CastleFlag {
        CastleFlag::new(self.flag_pole.castle_flag_x, self.flag_pole.castle_flag_y)
    }

    /// Enemies of wave `n` (1-based), lined up to the right of `left`.
    pub fn wave(&self, n: u8, left: i32, now: u64) -> Vec<Enemy> {
        let Some(specs) = usize::from(n)
            .checked_sub(1)
            .and_then(|i| self.enemy_waves.get(i))
        else {
            return Vec::new();
        };
        specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let x = left + i as i32 * WAVE_SPACING;
                Enemy::new(spec.kind, x, spec.bottom, Direction::Left, now)
            })
            .collect()
    }

    /// The classic first level.
    pub fn world_1_1() -> Self {
        use Contents::{Coin, Empty, Mushroom, SixCoins, Star};

        let ground = [
            solid(0, GROUND_HEIGHT, 2953, 60),
            solid(3048, GROUND_HEIGHT, 635, 60),
            solid(3819, GROUND_HEIGHT, 2735, 60),
            solid(6647, GROUND_HEIGHT, 2300, 60),
        ];
        let pipes = [
            solid(1202, 452, 83, 82),
            solid(1631, 409, 83, 140),
            solid(1973, 366, 83, 170),
            solid(2445, 366, 83, 170),
            solid(6989, 452, 83, 82),
            solid(7675, 452, 83, 82),
        ];
        let steps = [
            solid(5745, 495, 40, 44),
            solid(5788, 452, 40, 44),
            solid(5831, 409, 40, 44),
            solid(5874, 366, 40, 176),
            solid(6001, 366, 40, 176),
            solid(6044, 408, 40, 40),
            solid(6087, 452, 40, 40),
            solid(6130, 495, 40, 40),
            solid(6345, 495, 40, 40),
            solid(6388, 452, 40, 40),
            solid(6431, 409, 40, 40),
            solid(6474, 366, 40, 40),
            solid(6517, 366, 40, 176),
            solid(6644, 366, 40, 176),
            solid(6687, 408, 40, 40),
            solid(6728, 452, 40, 40),
            solid(6771, 495, 40, 40),
            solid(7760, 495, 40, 40),
            solid(7803, 452, 40, 40),
            solid(7845, 409, 40, 40),
            solid(7888, 366, 40, 40),
            solid(7931, 323, 40, 40),
            solid(7974, 280, 40, 40),
            solid(8017, 237, 40, 40),
            solid(8060, 194, 40, 40),
            solid(8103, 194, 40, 360),
            solid(8488, 495, 40, 40),
        ];

        let mut bricks = vec![
            block(858, 365, Empty),
            block(944, 365, Empty),
            block(1030, 365, Empty),
            block(3299, 365, Empty),
            block(3385, 365, Empty),
        ];
        bricks.extend((0..8).map(|i| block(3430 + i * 43, 193, Empty)));
        bricks.extend([
            block(3901, 193, Empty),
            block(3944, 193, Empty),
            block(3987, 193, Empty),
            block(4030, 365, SixCoins),
            block(4287, 365, Empty),
            block(4330, 365, Star),
            block(5058, 365, Empty),
            block(5230, 193, Empty),
            block(5273, 193, Empty),
            block(5316, 193, Empty),
            block(5488, 193, Empty),
            block(5574, 193, Empty),
            block(5617, 193, Empty),
            block(5531, 365, Empty),
            block(5574, 365, Empty),
            block(7202, 365, Empty),
            block(7245, 365, Empty),
            block(7331, 365, Empty),
        ]);

        let coin_boxes = vec![
            block(685, 365, Coin),
            block(901, 365, Mushroom),
            block(987, 365, Coin),
            block(943, 193, Coin),
            block(3342, 365, Mushroom),
            block(4030, 193, Coin),
            block(4544, 365, Coin),
            block(4672, 365, Coin),
            block(4672, 193, Mushroom),
            block(4800, 365, Coin),
            block(5531, 193, Coin),
            block(7288, 365, Coin),
        ];

        let goomba = EnemySpec {
            kind: EnemyKind::Goomba,
            bottom: GROUND_HEIGHT,
        };
        let high_goomba = EnemySpec {
            bottom: 193,
            ..goomba
        };
        let koopa = EnemySpec {
            kind: EnemyKind::Koopa,
            bottom: GROUND_HEIGHT,
        };
        let enemy_waves = vec![
            vec![goomba],
            vec![high_goomba],
            vec![goomba, goomba],
            vec![high_goomba, high_goomba],
            vec![goomba, goomba],
            vec![koopa],
            vec![goomba, goomba],
            vec![goomba, goomba],
            vec![goomba, goomba],
            vec![goomba, goomba],
        ];

        let wave_xs = [510, 1400, 1740, 3080, 3750, 4150, 4470, 4950, 5100, 6800];
        let mut checkpoints: Vec<CheckpointSpec> = wave_xs
            .iter()
            .zip(1u8..)
            .map(|(&x, n)| CheckpointSpec {
                id: CheckpointKind::EnemyWave(n),
                x,
                y: 0,
                w: default_checkpoint_width(),
                h: default_checkpoint_height(),
            })
            .collect();
        checkpoints.extend([
            CheckpointSpec {
                id: CheckpointKind::FlagPole,
                x: 8504,
                y: 5,
                w: 6,
                h: SCREEN_HEIGHT,
            },
            CheckpointSpec {
                id: CheckpointKind::CastleEntry,
                x: 8775,
                y: 0,
                w: default_checkpoint_width(),
                h: default_checkpoint_height(),
            },
            CheckpointSpec {
                id: CheckpointKind::SecretMushroom,
                x: 2740,
                y: 360,
                w: 40,
                h: 12,
            },
        ]);

        Self {
            width: LEVEL_WIDTH,
            colliders: ground.into_iter().chain(pipes).chain(steps).collect(),
            bricks,
            coin_boxes,
            flag_pole: FlagPoleSpec {
                x: 8505,
                flag_y: 100,
                segment_tops: vec![97, 137, 177, 217, 257, 297, 337, 377, 417, 450],
                finial_bottom: 97,
                castle_flag_x: 8745,
                castle_flag_y: 322,
            },
            enemy_waves,
            checkpoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_LEVEL: &str = r#"
width = 1600
colliders = [{ x = 0, y = 538, w = 1600, h = 60 }]
bricks = [
    { x = 200, y = 365 },
    { x = 243, y = 365, contents = "6coins" },
]
coin_boxes = [{ x = 286, y = 365, contents = "1up_mushroom" }]
enemy_waves = [[{ kind = "goomba" }, { kind = "koopa", bottom = 193 }]]
checkpoints = [
    { id = "1", x = 400 },
    { id = "secret_mushroom", x = 300, y = 360, w = 40, h = 12 },
]

[flag_pole]
x = 1400
flag_y = 100
segment_tops = [97, 137]
finial_bottom = 97
castle_flag_x = 1500
castle_flag_y = 322
"#;

    #[test]
    fn world_1_1_is_valid() {
        let layout = LevelLayout::world_1_1();
        assert!(layout.validate().is_ok());
        assert_eq!(layout.colliders.len(), 4 + 6 + 27);
        assert_eq!(layout.bricks.len(), 31);
        assert_eq!(layout.coin_boxes.len(), 12);
        assert_eq!(layout.enemy_waves.len(), 10);
        assert_eq!(layout.checkpoints.len(), 13);
        assert_eq!(layout.flag_pole.segment_tops.len(), 10);
    }

    #[test]
    fn world_1_1_survives_json() {
        let layout = LevelLayout::world_1_1();
        let json = serde_json::to_string(&layout).unwrap();
        assert!(json.contains("\"6coins\""));
        assert!(json.contains("\"secret_mushroom\""));
        let back: LevelLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
        assert!(back.validate().is_ok());
    }

    #[test]
    fn world_1_1_special_blocks() {
        let layout = LevelLayout::world_1_1();
        let six = layout
            .bricks()
            .into_iter()
            .filter(|b| b.contents == Contents::SixCoins)
            .count();
        assert_eq!(six, 1);
        let mushrooms = layout
            .coin_boxes
            .iter()
            .filter(|b| b.contents == Contents::Mushroom)
            .count();
        assert_eq!(mushrooms, 3);
    }

    #[test]
    fn parses_toml_layout() {
        let layout = LevelLayout::from_toml(SMALL_LEVEL).expect("valid layout");
        assert_eq!(layout.bricks[0].contents, Contents::Empty);
        assert_eq!(layout.bricks[1].contents, Contents::SixCoins);
        assert_eq!(layout.coin_boxes[0].contents, Contents::OneUp);
        assert_eq!(layout.enemy_waves[0][0].bottom, GROUND_HEIGHT);
        assert_eq!(layout.checkpoints[0].id, CheckpointKind::EnemyWave(1));
        assert_eq!((layout.checkpoints[0].w, layout.checkpoints[0].h), (10, 600));
        assert_eq!(layout.checkpoints[1].id, CheckpointKind::SecretMushroom);
    }

    #[test]
    fn unknown_contents_is_a_parse_error() {
        let src = SMALL_LEVEL.replace("\"6coins\"", "\"banana\"");
        assert!(matches!(
            LevelLayout::from_toml(&src),
            Err(SceneError::LayoutParse(_))
        ));
    }

    #[test]
    fn unknown_checkpoint_is_rejected() {
        let src = SMALL_LEVEL.replace("id = \"1\"", "id = \"99\"");
        assert!(LevelLayout::from_toml(&src).is_err());
    }

    #[test]
    fn misplaced_contents_are_invalid() {
        let src = SMALL_LEVEL.replace("\"1up_mushroom\"", "\"6coins\"");
        assert!(matches!(
            LevelLayout::from_toml(&src),
            Err(SceneError::InvalidLayout(_))
        ));
        let mut layout = LevelLayout::world_1_1();
        layout.bricks[0].contents = Contents::Coin;
        assert!(matches!(layout.validate(), Err(SceneError::InvalidLayout(_))));
    }

    #[test]
    fn checkpoint_without_wave_is_invalid() {
        let mut layout = LevelLayout::world_1_1();
        layout.enemy_waves.truncate(9);
        assert!(matches!(layout.validate(), Err(SceneError::InvalidLayout(_))));
    }

    #[test]
    fn empty_wave_is_invalid() {
        let mut layout = LevelLayout::world_1_1();
        layout.enemy_waves[4].clear();
        let Err(SceneError::InvalidLayout(msg)) = layout.validate() else {
            panic!("empty wave accepted");
        };
        assert!(msg.contains("wave 5"));
    }

    #[test]
    fn waves_line_up_from_the_left_edge() {
        let layout = LevelLayout::world_1_1();
        let wave = layout.wave(3, 1000, 0);
        assert_eq!(wave.len(), 2);
        assert_eq!(wave[0].rect.x, 1000);
        assert_eq!(wave[1].rect.x, 1060);
        assert!(wave.iter().all(|e| e.direction == Direction::Left));
        assert_eq!(layout.wave(2, 0, 0)[0].rect.bottom(), 193);
        assert_eq!(layout.wave(6, 0, 0)[0].kind, EnemyKind::Koopa);
        assert!(layout.wave(0, 0, 0).is_empty());
        assert!(layout.wave(11, 0, 0).is_empty());
    }

    #[test]
    fn layout_survives_toml_round_trip() {
        let layout = LevelLayout::world_1_1();
        let text = toml::to_string(&layout).expect("serialize");
        assert_eq!(LevelLayout::from_toml(&text).ok(), Some(layout));
    }
}
