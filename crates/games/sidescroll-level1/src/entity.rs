use serde::{Deserialize, Serialize};

use sidescroll_core::geometry::Rect;

/// Shared view of every level object: where it is and which image to show.
pub trait Sprite {
    fn rect(&self) -> Rect;

    /// Pre-loaded atlas the current image comes from.
    fn atlas(&self) -> &'static str;

    /// Frame within the atlas.
    fn frame(&self) -> usize;
}

/// Index of the first sprite in `group` overlapping `rect`, in group order.
pub fn first_collision<T: Sprite>(rect: &Rect, group: &[T]) -> Option<usize> {
    group.iter().position(|s| s.rect().overlaps(rect))
}

/// Like [`first_collision`] but skipping the sprite at `skip`.
pub fn first_collision_except<T: Sprite>(rect: &Rect, group: &[T], skip: usize) -> Option<usize> {
    group
        .iter()
        .enumerate()
        .find(|(i, s)| *i != skip && s.rect().overlaps(rect))
        .map(|(i, _)| i)
}

pub fn collides_any<T: Sprite>(rect: &Rect, group: &[T]) -> bool {
    first_collision(rect, group).is_some()
}

/// Invisible solid: ground segment, pipe, or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collider {
    pub rect: Rect,
}

impl Collider {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
        }
    }
}

impl Sprite for Collider {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn atlas(&self) -> &'static str {
        "collider"
    }

    fn frame(&self) -> usize {
        0
    }
}
