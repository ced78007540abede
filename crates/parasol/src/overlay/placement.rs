use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geom::{Align, Direction, Expanse, Rect};

/// Where overlay content sits relative to its reference element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Above, centered.
    #[default]
    Top,
    /// Above, left edges aligned.
    TopStart,
    /// Above, right edges aligned.
    TopEnd,
    /// Below, centered.
    Bottom,
    /// Below, left edges aligned.
    BottomStart,
    /// Below, right edges aligned.
    BottomEnd,
    /// Left, centered.
    Left,
    /// Left, top edges aligned.
    LeftStart,
    /// Left, bottom edges aligned.
    LeftEnd,
    /// Right, centered.
    Right,
    /// Right, top edges aligned.
    RightStart,
    /// Right, bottom edges aligned.
    RightEnd,
}

impl Placement {
    /// The side of the reference the content sits on.
    pub fn side(&self) -> Direction {
        match self {
            Self::Top | Self::TopStart | Self::TopEnd => Direction::Up,
            Self::Bottom | Self::BottomStart | Self::BottomEnd => Direction::Down,
            Self::Left | Self::LeftStart | Self::LeftEnd => Direction::Left,
            Self::Right | Self::RightStart | Self::RightEnd => Direction::Right,
        }
    }

    /// Alignment along the edge of the reference.
    pub fn align(&self) -> Align {
        match self {
            Self::Top | Self::Bottom | Self::Left | Self::Right => Align::Center,
            Self::TopStart | Self::BottomStart | Self::LeftStart | Self::RightStart => {
                Align::Start
            }
            Self::TopEnd | Self::BottomEnd | Self::LeftEnd | Self::RightEnd => Align::End,
        }
    }

    /// Compute the content rectangle for content of size `content`, placed
    /// against `reference` with `offset` cells of gap. Coordinates saturate at
    /// zero; the result is not clamped to any viewport.
    pub fn position(&self, reference: Rect, content: Expanse, offset: u32) -> Rect {
        let align = self.align();
        let (x, y) = match self.side() {
            Direction::Up => (
                align.place(reference.tl.x, reference.w, content.w),
                reference.tl.y.saturating_sub(content.h.saturating_add(offset)),
            ),
            Direction::Down => (
                align.place(reference.tl.x, reference.w, content.w),
                reference.bottom().saturating_add(offset),
            ),
            Direction::Left => (
                reference.tl.x.saturating_sub(content.w.saturating_add(offset)),
                align.place(reference.tl.y, reference.h, content.h),
            ),
            Direction::Right => (
                reference.right().saturating_add(offset),
                align.place(reference.tl.y, reference.h, content.h),
            ),
        };
        Rect::new(x, y, content.w, content.h)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::TopStart => "top-start",
            Self::TopEnd => "top-end",
            Self::Bottom => "bottom",
            Self::BottomStart => "bottom-start",
            Self::BottomEnd => "bottom-end",
            Self::Left => "left",
            Self::LeftStart => "left-start",
            Self::LeftEnd => "left-end",
            Self::Right => "right",
            Self::RightStart => "right-start",
            Self::RightEnd => "right-end",
        })
    }
}
