use super::Point;

/// An axis-aligned rectangle anchored at its top-left corner. Edges are
/// half-open: a rectangle contains `tl` but not `tl + (w, h)`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width in cells.
    pub w: u32,
    /// Height in cells.
    pub h: u32,
}

impl Rect {
    /// Construct a rectangle from a corner and dimensions.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// The x coordinate one past the right edge.
    pub fn right(&self) -> u32 {
        self.tl.x.saturating_add(self.w)
    }

    /// The y coordinate one past the bottom edge.
    pub fn bottom(&self) -> u32 {
        self.tl.y.saturating_add(self.h)
    }

    /// Is either dimension zero?
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Does this rectangle contain the point?
    pub fn contains_point(&self, p: impl Into<Point>) -> bool {
        let p = p.into();
        p.x >= self.tl.x && p.x < self.right() && p.y >= self.tl.y && p.y < self.bottom()
    }

    /// Do the two rectangles share any cell?
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.tl.x < other.right()
            && other.tl.x < self.right()
            && self.tl.y < other.bottom()
            && other.tl.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn contains_point_is_half_open() {
        let r = Rect::new(10, 10, 5, 5);
        assert!(r.contains_point((10, 10)));
        assert!(r.contains_point((14, 14)));
        assert!(!r.contains_point((15, 14)));
        assert!(!r.contains_point((14, 15)));
        assert!(!r.contains_point((9, 10)));
        assert!(!Rect::new(3, 3, 0, 0).contains_point((3, 3)));
    }

    #[test]
    fn intersects() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(&Rect::new(9, 9, 2, 2)));
        assert!(!a.intersects(&Rect::new(10, 0, 2, 2)));
        assert!(!a.intersects(&Rect::new(5, 5, 0, 3)));
    }

    proptest! {
        #[test]
        fn contained_points_lie_within_edges(
            x in 0u32..100,
            y in 0u32..100,
            w in 0u32..50,
            h in 0u32..50,
            px in 0u32..200,
            py in 0u32..200,
        ) {
            let r = Rect::new(x, y, w, h);
            if r.contains_point((px, py)) {
                prop_assert!(px >= r.tl.x && px < r.right());
                prop_assert!(py >= r.tl.y && py < r.bottom());
                prop_assert!(!r.is_empty());
            }
        }
    }
}
