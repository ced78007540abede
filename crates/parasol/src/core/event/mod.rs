/// Keyboard input.
pub mod key;
/// Pointer input.
pub mod mouse;

use crate::OverlayId;

/// This enum represents all the raw events the stage dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A keystroke.
    Key(key::Key),
    /// A pointer action.
    Mouse(mouse::MouseEvent),
    /// The reference element of an overlay gained focus.
    Focus(OverlayId),
    /// The reference element of an overlay lost focus.
    Blur(OverlayId),
}

impl From<key::Key> for Event {
    fn from(k: key::Key) -> Self {
        Self::Key(k)
    }
}

impl From<mouse::MouseEvent> for Event {
    fn from(m: mouse::MouseEvent) -> Self {
        Self::Mouse(m)
    }
}
