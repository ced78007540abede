use super::{Point, Rect};

/// A width and height without a location. Overlay content is measured as an
/// `Expanse` and positioned later.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Expanse {
    /// Width in cells.
    pub w: u32,
    /// Height in cells.
    pub h: u32,
}

impl Expanse {
    /// Construct an expanse.
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Place this expanse with its top-left corner at `tl`.
    pub fn at(&self, tl: Point) -> Rect {
        Rect { tl, w: self.w, h: self.h }
    }

    /// Center this expanse within `outer`. Dimensions larger than `outer` are
    /// clamped to it.
    pub fn centered_in(&self, outer: Rect) -> Rect {
        let w = self.w.min(outer.w);
        let h = self.h.min(outer.h);
        Rect::new(
            outer.tl.x.saturating_add((outer.w - w) / 2),
            outer.tl.y.saturating_add((outer.h - h) / 2),
            w,
            h,
        )
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn centered() {
        let outer = Rect::new(0, 0, 80, 24);
        assert_eq!(Expanse::new(20, 10).centered_in(outer), Rect::new(30, 7, 20, 10));
        assert_eq!(Expanse::new(100, 30).centered_in(outer), outer);
    }

    proptest! {
        #[test]
        fn centered_stays_inside(
            x in 0u32..1000,
            y in 0u32..1000,
            ow in 0u32..500,
            oh in 0u32..500,
            w in 0u32..600,
            h in 0u32..600,
        ) {
            let outer = Rect::new(x, y, ow, oh);
            let inner = Expanse::new(w, h).centered_in(outer);
            prop_assert!(inner.tl.x >= outer.tl.x && inner.right() <= outer.right());
            prop_assert!(inner.tl.y >= outer.tl.y && inner.bottom() <= outer.bottom());
        }
    }
}
