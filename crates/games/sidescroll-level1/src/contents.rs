//! What a block releases when bumped, and the rule that swaps mushrooms
//! for fire flowers as the player changes size.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use sidescroll_core::error::SceneError;

use crate::bricks::Brick;
use crate::coin::Coin;
use crate::coin_box::CoinBox;
use crate::powerups::Powerup;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contents {
    #[default]
    Empty,
    /// A brick that pays out six coins, one per bump.
    #[serde(rename = "6coins")]
    SixCoins,
    Coin,
    Mushroom,
    FireFlower,
    Star,
    #[serde(rename = "1up_mushroom")]
    OneUp,
}

impl Contents {
    /// Whether a brick may hold these contents.
    pub fn allowed_in_brick(self) -> bool {
        matches!(
            self,
            Contents::Empty
                | Contents::SixCoins
                | Contents::Star
                | Contents::Mushroom
                | Contents::FireFlower
        )
    }

    /// Whether a coin box may hold these contents.
    pub fn allowed_in_coin_box(self) -> bool {
        matches!(
            self,
            Contents::Coin
                | Contents::Mushroom
                | Contents::FireFlower
                | Contents::Star
                | Contents::OneUp
        )
    }

    /// Power-up released at (`centerx`, `box_y`), if these contents are one.
    pub fn powerup(self, centerx: i32, box_y: i32, now: u64) -> Option<Powerup> {
        match self {
            Contents::Mushroom => Some(Powerup::mushroom(centerx, box_y, now)),
            Contents::FireFlower => Some(Powerup::fire_flower(centerx, box_y, now)),
            Contents::Star => Some(Powerup::star(centerx, box_y, now)),
            Contents::OneUp => Some(Powerup::life_mushroom(centerx, box_y, now)),
            Contents::Empty | Contents::SixCoins | Contents::Coin => None,
        }
    }
}

impl fmt::Display for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Contents::Empty => "empty",
            Contents::SixCoins => "6coins",
            Contents::Coin => "coin",
            Contents::Mushroom => "mushroom",
            Contents::FireFlower => "fireflower",
            Contents::Star => "star",
            Contents::OneUp => "1up_mushroom",
        };
        f.write_str(name)
    }
}

impl FromStr for Contents {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "empty" => Ok(Contents::Empty),
            "6coins" => Ok(Contents::SixCoins),
            "coin" => Ok(Contents::Coin),
            "mushroom" => Ok(Contents::Mushroom),
            "fireflower" => Ok(Contents::FireFlower),
            "star" => Ok(Contents::Star),
            "1up_mushroom" => Ok(Contents::OneUp),
            other => Err(SceneError::InvalidLayout(format!(
                "unknown block contents '{other}'"
            ))),
        }
    }
}

/// Something a block put into the level this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Spawn {
    Coin(Coin),
    Powerup(Powerup),
}

/// The player's size changed; growth items follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeChange {
    BecameBig,
    BecameSmall,
}

/// Swap every pending mushroom for a fire flower (or back) across all
/// bricks and coin boxes, so the next block hands out the right item.
pub fn apply_size_change(change: SizeChange, bricks: &mut [Brick], coin_boxes: &mut [CoinBox]) {
    let (from, to) = match change {
        SizeChange::BecameBig => (Contents::Mushroom, Contents::FireFlower),
        SizeChange::BecameSmall => (Contents::FireFlower, Contents::Mushroom),
    };
    let swap = |contents: &mut Contents| {
        if *contents == from {
            *contents = to;
        }
    };
    bricks.iter_mut().for_each(|b| swap(&mut b.contents));
    coin_boxes.iter_mut().for_each(|b| swap(&mut b.contents));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_layout_names() {
        assert_eq!("6coins".parse::<Contents>().ok(), Some(Contents::SixCoins));
        assert_eq!("1up_mushroom".parse::<Contents>().ok(), Some(Contents::OneUp));
        assert_eq!("".parse::<Contents>().ok(), Some(Contents::Empty));
        assert!(matches!(
            "banana".parse::<Contents>(),
            Err(SceneError::InvalidLayout(_))
        ));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for c in [
            Contents::Empty,
            Contents::SixCoins,
            Contents::Coin,
            Contents::Mushroom,
            Contents::FireFlower,
            Contents::Star,
            Contents::OneUp,
        ] {
            assert_eq!(c.to_string().parse::<Contents>().ok(), Some(c));
        }
    }

    #[test]
    fn placement_rules() {
        assert!(Contents::SixCoins.allowed_in_brick());
        assert!(!Contents::SixCoins.allowed_in_coin_box());
        assert!(Contents::OneUp.allowed_in_coin_box());
        assert!(!Contents::Coin.allowed_in_brick());
        assert!(!Contents::Empty.allowed_in_coin_box());
    }

    #[test]
    fn size_change_flips_growth_items_only() {
        let mut bricks = vec![
            Brick::new(0, 193, Contents::Mushroom),
            Brick::new(43, 193, Contents::Star),
        ];
        let mut boxes = vec![
            CoinBox::new(0, 365, Contents::Mushroom),
            CoinBox::new(43, 365, Contents::Coin),
        ];
        apply_size_change(SizeChange::BecameBig, &mut bricks, &mut boxes);
        assert_eq!(bricks[0].contents, Contents::FireFlower);
        assert_eq!(bricks[1].contents, Contents::Star);
        assert_eq!(boxes[0].contents, Contents::FireFlower);
        assert_eq!(boxes[1].contents, Contents::Coin);

        apply_size_change(SizeChange::BecameSmall, &mut bricks, &mut boxes);
        assert_eq!(bricks[0].contents, Contents::Mushroom);
        assert_eq!(boxes[0].contents, Contents::Mushroom);
    }

    #[test]
    fn only_items_become_powerups() {
        assert!(Contents::Coin.powerup(0, 0, 0).is_none());
        assert!(Contents::SixCoins.powerup(0, 0, 0).is_none());
        let p = Contents::OneUp.powerup(100, 365, 0);
        assert_eq!(
            p.map(|p| p.kind),
            Some(crate::powerups::PowerupKind::LifeMushroom)
        );
    }
}
