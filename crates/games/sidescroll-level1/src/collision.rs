//! Collision helpers shared by the level pipeline.
//!
//! The player's collision checks run in a fixed priority order per axis and
//! only the first group that reports a hit is acted on. That order decides
//! which of two simultaneous contacts wins, so it lives here as data.

use sidescroll_core::geometry::Rect;

use crate::bricks::Brick;
use crate::coin_box::CoinBox;
use crate::entity::{Collider, Sprite, first_collision};

/// Sprite groups the player is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    CoinBox,
    Brick,
    Collider,
    Enemy,
    Shell,
    Powerup,
}

impl Target {
    /// X-axis priority, highest first.
    pub const X_ORDER: [Target; 6] = [
        Target::CoinBox,
        Target::Brick,
        Target::Collider,
        Target::Enemy,
        Target::Shell,
        Target::Powerup,
    ];

    /// Y-axis priority, highest first.
    pub const Y_ORDER: [Target; 6] = [
        Target::CoinBox,
        Target::Brick,
        Target::Collider,
        Target::Enemy,
        Target::Shell,
        Target::Powerup,
    ];
}

/// Per-group hit results for one axis test: the index of the first sprite
/// in each group that overlaps the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hits {
    pub coin_box: Option<usize>,
    pub brick: Option<usize>,
    pub collider: Option<usize>,
    pub enemy: Option<usize>,
    pub shell: Option<usize>,
    pub powerup: Option<usize>,
}

impl Hits {
    pub fn get(&self, target: Target) -> Option<usize> {
        match target {
            Target::CoinBox => self.coin_box,
            Target::Brick => self.brick,
            Target::Collider => self.collider,
            Target::Enemy => self.enemy,
            Target::Shell => self.shell,
            Target::Powerup => self.powerup,
        }
    }

    /// First target in `order` with a hit, with the index into its group.
    pub fn first_in(&self, order: &[Target]) -> Option<(Target, usize)> {
        order
            .iter()
            .find_map(|&t| self.get(t).map(|i| (t, i)))
    }

    pub fn first_x(&self) -> Option<(Target, usize)> {
        self.first_in(&Target::X_ORDER)
    }

    pub fn first_y(&self) -> Option<(Target, usize)> {
        self.first_in(&Target::Y_ORDER)
    }
}

/// Given two near-simultaneous targets on the same axis, keep only the one
/// whose centre is horizontally closer to `player`. On a tie the second
/// target wins.
pub fn prevent_collision_conflict(
    player: &Rect,
    first: Option<Rect>,
    second: Option<Rect>,
) -> (bool, bool) {
    match (first, second) {
        (Some(a), Some(b)) => {
            if player.center_distance_x(&a) < player.center_distance_x(&b) {
                (true, false)
            } else {
                (false, true)
            }
        },
        (a, b) => (a.is_some(), b.is_some()),
    }
}

/// Read-only view of everything solid for entities other than the player.
#[derive(Clone, Copy)]
pub struct Solids<'a> {
    pub ground: &'a [Collider],
    pub bricks: &'a [Brick],
    pub coin_boxes: &'a [CoinBox],
}

impl<'a> Solids<'a> {
    /// Rect of the first solid overlapping `rect`, tested ground, then
    /// bricks, then coin boxes.
    pub fn first_hit(&self, rect: &Rect) -> Option<Rect> {
        first_collision(rect, self.ground)
            .map(|i| self.ground[i].rect())
            .or_else(|| first_collision(rect, self.bricks).map(|i| self.bricks[i].rect()))
            .or_else(|| first_collision(rect, self.coin_boxes).map(|i| self.coin_boxes[i].rect()))
    }

    pub fn overlaps(&self, rect: &Rect) -> bool {
        self.first_hit(rect).is_some()
    }

    /// Whether something solid sits directly under `rect`.
    pub fn supports(&self, rect: &Rect) -> bool {
        self.overlaps(&rect.offset(0, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_priority_prefers_coin_box_over_everything() {
        let hits = Hits {
            coin_box: Some(2),
            brick: Some(0),
            collider: Some(1),
            enemy: Some(0),
            shell: None,
            powerup: Some(0),
        };
        assert_eq!(hits.first_x(), Some((Target::CoinBox, 2)));
    }

    #[test]
    fn x_priority_terrain_before_enemies() {
        let hits = Hits {
            collider: Some(3),
            enemy: Some(0),
            ..Default::default()
        };
        assert_eq!(hits.first_x(), Some((Target::Collider, 3)));
    }

    #[test]
    fn y_priority_enemy_before_shell_and_powerup() {
        let hits = Hits {
            enemy: Some(1),
            shell: Some(0),
            powerup: Some(0),
            ..Default::default()
        };
        assert_eq!(hits.first_y(), Some((Target::Enemy, 1)));
        assert_eq!(Hits::default().first_y(), None);
    }

    #[test]
    fn both_axes_share_one_priority_list() {
        assert_eq!(Target::X_ORDER, Target::Y_ORDER);
        let hits = Hits {
            brick: Some(4),
            shell: Some(1),
            ..Default::default()
        };
        assert_eq!(hits.first_x(), hits.first_y());
        assert_eq!(hits.first_in(&[Target::Shell, Target::Brick]), Some((Target::Shell, 1)));
    }

    #[test]
    fn conflict_keeps_the_closer_target() {
        let player = Rect::new(100, 300, 40, 80);
        let near = Rect::new(105, 250, 43, 43);
        let far = Rect::new(140, 250, 43, 43);
        assert_eq!(
            prevent_collision_conflict(&player, Some(near), Some(far)),
            (true, false)
        );
        assert_eq!(
            prevent_collision_conflict(&player, Some(far), Some(near)),
            (false, true)
        );
    }

    #[test]
    fn conflict_tie_keeps_second() {
        let player = Rect::new(100, 300, 40, 80);
        let left = Rect::new(80, 250, 40, 40);
        let right = Rect::new(120, 250, 40, 40);
        assert_eq!(
            prevent_collision_conflict(&player, Some(left), Some(right)),
            (false, true)
        );
    }

    #[test]
    fn conflict_passes_single_targets_through() {
        let player = Rect::new(0, 0, 10, 10);
        let r = Rect::new(0, 0, 5, 5);
        assert_eq!(prevent_collision_conflict(&player, Some(r), None), (true, false));
        assert_eq!(prevent_collision_conflict(&player, None, Some(r)), (false, true));
        assert_eq!(prevent_collision_conflict(&player, None, None), (false, false));
    }

    #[test]
    fn solids_support_check() {
        let ground = [Collider::new(0, 538, 500, 60)];
        let solids = Solids {
            ground: &ground,
            bricks: &[],
            coin_boxes: &[],
        };
        let standing = Rect::with_bottom(10, 538, 40, 40);
        let floating = Rect::with_bottom(10, 530, 40, 40);
        assert!(solids.supports(&standing));
        assert!(!solids.overlaps(&standing));
        assert!(!solids.supports(&floating));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn conflict_never_keeps_both(
                px in 0i32..1000, ax in 0i32..1000, bx in 0i32..1000,
            ) {
                let player = Rect::new(px, 300, 40, 80);
                let a = Rect::new(ax, 250, 43, 43);
                let b = Rect::new(bx, 250, 43, 43);
                let (keep_a, keep_b) = prevent_collision_conflict(&player, Some(a), Some(b));
                prop_assert!(keep_a != keep_b);
                if keep_a {
                    prop_assert!(player.center_distance_x(&a) < player.center_distance_x(&b));
                } else {
                    prop_assert!(player.center_distance_x(&b) <= player.center_distance_x(&a));
                }
            }
        }
    }
}
