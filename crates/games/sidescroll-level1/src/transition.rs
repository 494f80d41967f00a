//! Player appearance and the timed size-transition tables.
//!
//! A transition is a pure function of the milliseconds since it started:
//! each table maps elapsed time to the pose to show, and names the moment
//! the new size is committed.

use serde::{Deserialize, Serialize};

/// Hitbox size tier of a pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodySize {
    Small,
    /// Halfway image shown while growing.
    Mid,
    Big,
    /// Big player ducking.
    Crouch,
}

impl BodySize {
    pub const fn dimensions(self) -> (i32, i32) {
        match self {
            BodySize::Small => (30, 40),
            BodySize::Mid => (40, 60),
            BodySize::Big => (40, 80),
            BodySize::Crouch => (40, 55),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Palette {
    Normal,
    Fire,
    Green,
    Red,
    Black,
}

/// Sprite frame indices shared by every palette.
pub mod frames {
    pub const STAND: usize = 0;
    pub const WALK_FIRST: usize = 1;
    pub const WALK_LAST: usize = 3;
    pub const JUMP: usize = 4;
    pub const SKID: usize = 5;
    /// Death pose; also the throw pose while shooting.
    pub const DEATH: usize = 6;
    pub const CROUCH: usize = 7;
    pub const TRANSITION: usize = 8;
    pub const POLE_HIGH: usize = 9;
    pub const POLE_LOW: usize = 10;
}

/// What the player currently looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pose {
    pub size: BodySize,
    pub palette: Palette,
    pub frame: usize,
}

impl Pose {
    pub const fn new(size: BodySize, palette: Palette, frame: usize) -> Self {
        Self {
            size,
            palette,
            frame,
        }
    }

    pub fn atlas(&self) -> &'static str {
        match (self.size, self.palette) {
            (BodySize::Small, Palette::Normal) => "mario_small",
            (BodySize::Small, Palette::Green) => "mario_small_green",
            (BodySize::Small, Palette::Red) => "mario_small_red",
            (BodySize::Small, Palette::Black) => "mario_small_black",
            (BodySize::Small, Palette::Fire) => "mario_small",
            (BodySize::Mid, _) => "mario_mid",
            (BodySize::Big | BodySize::Crouch, Palette::Normal) => "mario_big",
            (BodySize::Big | BodySize::Crouch, Palette::Fire) => "mario_fire",
            (BodySize::Big | BodySize::Crouch, Palette::Green) => "mario_big_green",
            (BodySize::Big | BodySize::Crouch, Palette::Red) => "mario_big_red",
            (BodySize::Big | BodySize::Crouch, Palette::Black) => "mario_big_black",
        }
    }
}

/// Which edge stays put when a pose change resizes the hitbox. The bottom
/// edge is always kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    CenterX,
    Left,
}

/// Elapsed-time windows of one transition. Each window starts at its
/// millisecond offset and lasts until the next one; the last window is
/// open-ended.
#[derive(Debug)]
pub struct TransitionTable {
    pub windows: &'static [(u64, Pose)],
    pub commit_ms: u64,
    pub anchor: Anchor,
}

impl TransitionTable {
    /// Pose for `elapsed` ms into the transition, `None` before the first window.
    pub fn pose_at(&self, elapsed: u64) -> Option<Pose> {
        self.windows
            .iter()
            .rev()
            .find(|(start, _)| elapsed >= *start)
            .map(|(_, pose)| *pose)
    }

    /// Whether the new size should be committed at `elapsed`.
    pub fn is_complete(&self, elapsed: u64) -> bool {
        elapsed >= self.commit_ms
    }
}

const SMALL: Pose = Pose::new(BodySize::Small, Palette::Normal, frames::STAND);
const MID: Pose = Pose::new(BodySize::Mid, Palette::Normal, frames::STAND);
const BIG: Pose = Pose::new(BodySize::Big, Palette::Normal, frames::STAND);

pub static SMALL_TO_BIG: TransitionTable = TransitionTable {
    windows: &[
        (135, MID),
        (200, SMALL),
        (365, MID),
        (430, SMALL),
        (495, MID),
        (560, BIG),
        (625, SMALL),
        (690, MID),
        (755, BIG),
        (820, SMALL),
        (885, BIG),
    ],
    commit_ms: 885,
    anchor: Anchor::CenterX,
};

const fn fire_flash(palette: Palette) -> Pose {
    Pose::new(BodySize::Big, palette, 3)
}

pub static BIG_TO_FIRE: TransitionTable = TransitionTable {
    windows: &[
        (65, fire_flash(Palette::Fire)),
        (130, fire_flash(Palette::Green)),
        (195, fire_flash(Palette::Red)),
        (260, fire_flash(Palette::Black)),
        (325, fire_flash(Palette::Fire)),
        (390, fire_flash(Palette::Green)),
        (455, fire_flash(Palette::Red)),
        (520, fire_flash(Palette::Black)),
        (585, fire_flash(Palette::Fire)),
        (650, fire_flash(Palette::Green)),
        (715, fire_flash(Palette::Red)),
        (780, fire_flash(Palette::Black)),
        (845, fire_flash(Palette::Fire)),
        (910, fire_flash(Palette::Green)),
        (975, fire_flash(Palette::Red)),
    ],
    commit_ms: 975,
    anchor: Anchor::CenterX,
};

const SHRINK_BIG: Pose = Pose::new(BodySize::Big, Palette::Normal, frames::TRANSITION);
const SHRINK_SMALL: Pose = Pose::new(BodySize::Small, Palette::Normal, frames::TRANSITION);

pub static BIG_TO_SMALL: TransitionTable = TransitionTable {
    windows: &[
        (0, Pose::new(BodySize::Big, Palette::Normal, frames::JUMP)),
        (265, SHRINK_BIG),
        (330, SHRINK_SMALL),
        (395, SHRINK_BIG),
        (460, SHRINK_SMALL),
        (525, SHRINK_BIG),
        (590, SHRINK_SMALL),
        (655, SHRINK_BIG),
        (720, SHRINK_SMALL),
        (785, SHRINK_BIG),
        (850, SHRINK_SMALL),
    ],
    commit_ms: 850,
    anchor: Anchor::Left,
};

#[cfg(test)]
mod tests {
    use super::*;

    // ================================================================
    // Grow
    // ================================================================

    #[test]
    fn grow_waits_before_first_window() {
        assert_eq!(SMALL_TO_BIG.pose_at(0), None);
        assert_eq!(SMALL_TO_BIG.pose_at(134), None);
        assert_eq!(SMALL_TO_BIG.pose_at(135), Some(MID));
    }

    #[test]
    fn grow_alternates_then_commits_big() {
        assert_eq!(SMALL_TO_BIG.pose_at(210), Some(SMALL));
        assert_eq!(SMALL_TO_BIG.pose_at(600), Some(BIG));
        assert_eq!(SMALL_TO_BIG.pose_at(884), Some(SMALL));
        assert!(!SMALL_TO_BIG.is_complete(884));
        assert!(SMALL_TO_BIG.is_complete(885));
        assert_eq!(SMALL_TO_BIG.pose_at(5000), Some(BIG));
    }

    // ================================================================
    // Fire
    // ================================================================

    #[test]
    fn fire_flash_cycles_palettes() {
        assert_eq!(BIG_TO_FIRE.pose_at(64), None);
        assert_eq!(BIG_TO_FIRE.pose_at(99).map(|p| p.palette), Some(Palette::Fire));
        assert_eq!(BIG_TO_FIRE.pose_at(194).map(|p| p.palette), Some(Palette::Green));
        assert_eq!(BIG_TO_FIRE.pose_at(1039).map(|p| p.palette), Some(Palette::Red));
        assert!(BIG_TO_FIRE.is_complete(1039));
        assert!(!BIG_TO_FIRE.is_complete(974));
    }

    // ================================================================
    // Shrink
    // ================================================================

    #[test]
    fn shrink_starts_on_hurt_pose() {
        let pose = BIG_TO_SMALL.pose_at(0);
        assert_eq!(pose.map(|p| (p.size, p.frame)), Some((BodySize::Big, frames::JUMP)));
        assert_eq!(BIG_TO_SMALL.pose_at(264).map(|p| p.frame), Some(frames::JUMP));
    }

    #[test]
    fn shrink_alternates_sizes() {
        assert_eq!(BIG_TO_SMALL.pose_at(329), Some(SHRINK_BIG));
        assert_eq!(BIG_TO_SMALL.pose_at(394), Some(SHRINK_SMALL));
        assert_eq!(BIG_TO_SMALL.pose_at(849), Some(SHRINK_BIG));
        assert!(!BIG_TO_SMALL.is_complete(849));
        assert!(BIG_TO_SMALL.is_complete(914));
        assert_eq!(BIG_TO_SMALL.pose_at(914), Some(SHRINK_SMALL));
    }

    #[test]
    fn atlas_names_follow_size_and_palette() {
        assert_eq!(BIG.atlas(), "mario_big");
        assert_eq!(fire_flash(Palette::Fire).atlas(), "mario_fire");
        assert_eq!(SMALL.atlas(), "mario_small");
        assert_eq!(
            Pose::new(BodySize::Crouch, Palette::Red, frames::CROUCH).atlas(),
            "mario_big_red"
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn tables_are_pure_and_settle_after_commit(elapsed in 0u64..5000) {
                for table in [&SMALL_TO_BIG, &BIG_TO_FIRE, &BIG_TO_SMALL] {
                    prop_assert_eq!(table.pose_at(elapsed), table.pose_at(elapsed));
                    if table.is_complete(elapsed) {
                        prop_assert_eq!(table.pose_at(elapsed), table.pose_at(table.commit_ms));
                    }
                }
            }
        }
    }
}
