use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use sidescroll_core::error::SceneError;
use sidescroll_core::geometry::Rect;

use crate::entity::Sprite;

/// What touching a checkpoint triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CheckpointKind {
    /// Release enemy wave `n` (1-based).
    EnemyWave(u8),
    FlagPole,
    CastleEntry,
    SecretMushroom,
}

/// Highest enemy wave id.
pub const MAX_WAVE: u8 = 10;

impl FromStr for CheckpointKind {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "11" => Ok(CheckpointKind::FlagPole),
            "12" => Ok(CheckpointKind::CastleEntry),
            "secret_mushroom" => Ok(CheckpointKind::SecretMushroom),
            other => match other.parse::<u8>() {
                Ok(n) if (1..=MAX_WAVE).contains(&n) => Ok(CheckpointKind::EnemyWave(n)),
                _ => Err(SceneError::InvalidLayout(format!(
                    "unknown checkpoint id '{other}'"
                ))),
            },
        }
    }
}

impl TryFrom<String> for CheckpointKind {
    type Error = SceneError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CheckpointKind> for String {
    fn from(kind: CheckpointKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for CheckpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckpointKind::EnemyWave(n) => write!(f, "{n}"),
            CheckpointKind::FlagPole => f.write_str("11"),
            CheckpointKind::CastleEntry => f.write_str("12"),
            CheckpointKind::SecretMushroom => f.write_str("secret_mushroom"),
        }
    }
}

/// Invisible trigger volume; consumed on first touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub rect: Rect,
    pub kind: CheckpointKind,
}

impl Checkpoint {
    pub fn new(kind: CheckpointKind, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            kind,
        }
    }

    /// Full-height trigger strip at `x`.
    pub fn strip(kind: CheckpointKind, x: i32) -> Self {
        Self::new(kind, x, 0, 10, 600)
    }
}

impl Sprite for Checkpoint {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn atlas(&self) -> &'static str {
        "checkpoint"
    }

    fn frame(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_level_id() {
        for n in 1..=10u8 {
            assert_eq!(
                n.to_string().parse::<CheckpointKind>().ok(),
                Some(CheckpointKind::EnemyWave(n))
            );
        }
        assert_eq!("11".parse::<CheckpointKind>().ok(), Some(CheckpointKind::FlagPole));
        assert_eq!("12".parse::<CheckpointKind>().ok(), Some(CheckpointKind::CastleEntry));
        assert_eq!(
            "secret_mushroom".parse::<CheckpointKind>().ok(),
            Some(CheckpointKind::SecretMushroom)
        );
    }

    #[test]
    fn rejects_unknown_ids() {
        for bad in ["0", "13", "test_checkpoint", ""] {
            assert!(
                matches!(bad.parse::<CheckpointKind>(), Err(SceneError::InvalidLayout(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn strip_spans_screen_height() {
        let cp = Checkpoint::strip(CheckpointKind::EnemyWave(1), 510);
        assert_eq!(cp.rect, Rect::new(510, 0, 10, 600));
        let custom = Checkpoint::new(CheckpointKind::SecretMushroom, 100, 50, 20, 400);
        assert_eq!((custom.rect.x, custom.rect.y, custom.rect.w, custom.rect.h), (100, 50, 20, 400));
    }

    #[test]
    fn display_matches_layout_ids() {
        assert_eq!(CheckpointKind::EnemyWave(7).to_string(), "7");
        assert_eq!(CheckpointKind::FlagPole.to_string(), "11");
    }
}
