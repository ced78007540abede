use crate::{
    OverlayId,
    action::ActionKind,
    error::Result,
    geom::Rect,
    overlay::placement::Placement,
    style::{StyleDescriptor, StyleProps, StyleResolver, WidgetKind},
};

/// One styled element of an overlay's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// A text run.
    Text {
        /// Text content.
        text: String,
        /// Resolved style.
        style: StyleDescriptor,
    },
    /// A button.
    Button {
        /// Button label.
        label: String,
        /// Action the button invokes, if any.
        action: Option<ActionKind>,
        /// Show a busy indicator and ignore presses.
        loading: bool,
        /// Resolved style.
        style: StyleDescriptor,
    },
}

impl Part {
    /// Text of a text part or label of a button.
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text, .. } => text,
            Self::Button { label, .. } => label,
        }
    }
}

/// Collects the styled parts a widget renders. Styles are resolved as parts
/// are pushed.
pub struct Render<'a> {
    /// Style resolver.
    resolver: &'a dyn StyleResolver,
    /// Parts rendered so far.
    parts: Vec<Part>,
}

impl<'a> Render<'a> {
    /// A renderer that resolves through `resolver`.
    pub fn new(resolver: &'a dyn StyleResolver) -> Self {
        Self {
            resolver,
            parts: vec![],
        }
    }

    /// Push a text run.
    pub fn text(&mut self, text: impl Into<String>, props: &StyleProps) {
        self.parts.push(Part::Text {
            text: text.into(),
            style: self.resolver.resolve(WidgetKind::Text, props),
        });
    }

    /// Push a button. `props.loading` is carried onto the part.
    pub fn button(
        &mut self,
        label: impl Into<String>,
        action: Option<ActionKind>,
        props: &StyleProps,
    ) {
        self.parts.push(Part::Button {
            label: label.into(),
            action,
            loading: props.loading,
            style: self.resolver.resolve(WidgetKind::Button, props),
        });
    }

    /// Take the rendered parts.
    pub fn into_parts(self) -> Vec<Part> {
        self.parts
    }
}

/// Everything the presentation layer needs to draw one overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayFrame {
    /// The overlay.
    pub id: OverlayId,
    /// Widget family.
    pub kind: WidgetKind,
    /// Visibility.
    pub is_open: bool,
    /// Configured placement.
    pub placement: Placement,
    /// Computed content rectangle.
    pub area: Rect,
    /// Resolved style of the overlay container.
    pub style: StyleDescriptor,
    /// Styled content, in render order.
    pub parts: Vec<Part>,
}

impl OverlayFrame {
    /// The first button invoking `action`.
    pub fn button(&self, action: ActionKind) -> Option<&Part> {
        self.parts
            .iter()
            .find(|p| matches!(p, Part::Button { action: Some(a), .. } if *a == action))
    }
}

/// Draws overlay frames. Nothing flows back into overlay state.
pub trait OverlayRenderer {
    /// Draw one overlay.
    fn draw(&mut self, frame: &OverlayFrame) -> Result<()>;
}
