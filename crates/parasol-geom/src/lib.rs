//! Geometry primitives used for overlay hit-testing and placement.

/// Width/height size type.
mod expanse;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;

pub use expanse::Expanse;
pub use point::Point;
pub use rect::Rect;

/// Cardinal directions.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Direction {
    /// Upward direction.
    Up,
    /// Downward direction.
    Down,
    /// Leftward direction.
    Left,
    /// Rightward direction.
    Right,
}

/// Alignment of a span relative to another span on the same axis.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Align {
    /// Align leading edges.
    Start,
    /// Align centers.
    #[default]
    Center,
    /// Align trailing edges.
    End,
}

impl Align {
    /// Position a span of `len` against the span `[start, start + extent)`.
    /// Results clamp to the edges of the coordinate space.
    pub fn place(&self, start: u32, extent: u32, len: u32) -> u32 {
        match self {
            Self::Start => start,
            Self::Center => start.saturating_add(extent / 2).saturating_sub(len / 2),
            Self::End => start.saturating_add(extent).saturating_sub(len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_place() {
        assert_eq!(Align::Start.place(10, 20, 4), 10);
        assert_eq!(Align::Center.place(10, 20, 4), 18);
        assert_eq!(Align::End.place(10, 20, 4), 26);
        assert_eq!(Align::End.place(0, 2, 10), 0);
        assert_eq!(Align::Center.place(0, 2, 10), 0);
    }

    #[test]
    fn align_place_saturates() {
        assert_eq!(Align::End.place(u32::MAX, 10, 4), u32::MAX - 4);
        assert_eq!(Align::Center.place(u32::MAX - 1, 10, 0), u32::MAX);
    }
}
