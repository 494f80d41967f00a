use serde::{Deserialize, Serialize};

/// Axis-aligned integer rectangle in level pixels.
///
/// `right` and `bottom` are exclusive edges, so two rectangles that merely
/// share an edge do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// A `w`x`h` rectangle whose bottom-left corner sits at (`x`, `bottom`).
    pub const fn with_bottom(x: i32, bottom: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            y: bottom - h,
            w,
            h,
        }
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub const fn centerx(&self) -> i32 {
        self.x + self.w / 2
    }

    pub const fn centery(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    pub fn set_centerx(&mut self, centerx: i32) {
        self.x = centerx - self.w / 2;
    }

    /// Change the size while keeping the bottom edge and left edge fixed.
    pub fn resize_anchored(&mut self, w: i32, h: i32) {
        let bottom = self.bottom();
        self.w = w;
        self.h = h;
        self.set_bottom(bottom);
    }

    /// True when the interiors of the two rectangles intersect.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Copy of this rectangle moved by (`dx`, `dy`).
    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Horizontal distance between the two centres.
    pub fn center_distance_x(&self, other: &Rect) -> i32 {
        (self.centerx() - other.centerx()).abs()
    }
}

/// Facing or travel direction along the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// -1.0 for left, 1.0 for right.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Direction pointing from `from_x` towards `to_x`; ties resolve left.
    pub fn towards(from_x: i32, to_x: i32) -> Self {
        if to_x > from_x {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

/// Move a pixel coordinate by a fractional per-frame velocity, truncating
/// toward zero the way integer sprite rectangles accumulate motion.
pub fn step(pos: i32, vel: f32) -> i32 {
    (pos as f32 + vel) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_and_centres() {
        let r = Rect::new(10, 20, 40, 80);
        assert_eq!(r.right(), 50);
        assert_eq!(r.bottom(), 100);
        assert_eq!(r.centerx(), 30);
        assert_eq!(r.centery(), 60);
    }

    #[test]
    fn with_bottom_places_top_correctly() {
        let r = Rect::with_bottom(0, 538, 40, 40);
        assert_eq!(r.y, 498);
        assert_eq!(r.bottom(), 538);
    }

    #[test]
    fn shared_edge_is_not_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        let c = Rect::new(0, 10, 10, 10);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.overlaps(&a.offset(9, 9)));
    }

    #[test]
    fn resize_keeps_bottom_and_left() {
        let mut r = Rect::with_bottom(100, 538, 30, 40);
        r.resize_anchored(40, 80);
        assert_eq!(r.x, 100);
        assert_eq!(r.bottom(), 538);
        assert_eq!(r.h, 80);
    }

    #[test]
    fn setters_move_edges() {
        let mut r = Rect::new(0, 0, 20, 30);
        r.set_right(100);
        assert_eq!(r.x, 80);
        r.set_bottom(60);
        assert_eq!(r.y, 30);
        r.set_centerx(50);
        assert_eq!(r.x, 40);
    }

    #[test]
    fn direction_helpers() {
        assert_eq!(Direction::Left.sign(), -1.0);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
        assert_eq!(Direction::towards(10, 20), Direction::Right);
        assert_eq!(Direction::towards(20, 20), Direction::Left);
    }

    #[test]
    fn step_truncates_toward_zero() {
        assert_eq!(step(10, 1.9), 11);
        assert_eq!(step(10, -1.9), 8);
        assert_eq!(step(0, -0.5), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn overlap_is_symmetric(
                ax in -500i32..500, ay in -500i32..500, aw in 1i32..200, ah in 1i32..200,
                bx in -500i32..500, by in -500i32..500, bw in 1i32..200, bh in 1i32..200,
            ) {
                let a = Rect::new(ax, ay, aw, ah);
                let b = Rect::new(bx, by, bw, bh);
                prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            }

            #[test]
            fn set_bottom_roundtrips(y in -1000i32..1000, h in 1i32..300) {
                let mut r = Rect::new(0, 0, 10, h);
                r.set_bottom(y);
                prop_assert_eq!(r.bottom(), y);
            }
        }
    }
}
