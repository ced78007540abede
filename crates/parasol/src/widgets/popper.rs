//! Popper widget: plain popover content.

use crate::{
    error::Result,
    geom::Expanse,
    render::Render,
    style::{StyleProps, WidgetKind},
    widget::Widget,
};

/// A popover that shows a block of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popper {
    /// Content text.
    content: String,
    /// Explicit size, if set.
    size: Option<Expanse>,
}

impl Popper {
    /// Construct a popper showing `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            size: None,
        }
    }

    /// Fix the content box size instead of sizing to the text.
    pub fn with_size(mut self, size: Expanse) -> Self {
        self.size = Some(size);
        self
    }

    /// The content text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the content text.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }
}

/// Width and height of a block of text, one cell per char.
pub(crate) fn text_extent(text: &str) -> Expanse {
    let w = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let h = text.lines().count().max(1);
    Expanse::new(cells(w), cells(h))
}

/// A character count as a cell count, saturating at `u32::MAX`.
pub(crate) fn cells(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl Widget for Popper {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Popper
    }

    fn content_size(&self) -> Expanse {
        self.size.unwrap_or_else(|| text_extent(&self.content))
    }

    fn render(&self, r: &mut Render) -> Result<()> {
        r.text(self.content.clone(), &StyleProps::default());
        Ok(())
    }
}
