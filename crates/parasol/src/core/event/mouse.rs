use crate::{event::key, geom::Point};

/// Mouse button codes.
#[derive(Debug, PartialOrd, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Button {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button.
    Middle,
    /// No button (for move/scroll).
    None,
}

/// Mouse action kinds.
#[derive(Debug, PartialOrd, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Action {
    /// Button press.
    Down,
    /// Button release.
    Up,
    /// Mouse drag with button held.
    Drag,
    /// Mouse moved without button.
    Moved,
    /// Scroll wheel down.
    ScrollDown,
    /// Scroll wheel up.
    ScrollUp,
}

impl Action {
    /// Does this action move the pointer? Drags and plain moves both update
    /// hover state.
    pub fn is_motion(&self) -> bool {
        matches!(self, Self::Moved | Self::Drag)
    }
}

/// A raw pointer event in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// Mouse action type.
    pub action: Action,
    /// Mouse button.
    pub button: Button,
    /// Keyboard modifiers.
    pub modifiers: key::Mods,
    /// Pointer location.
    pub location: Point,
}

impl MouseEvent {
    /// A left-button press at a location.
    pub fn down(location: impl Into<Point>) -> Self {
        Self {
            action: Action::Down,
            button: Button::Left,
            modifiers: key::Empty,
            location: location.into(),
        }
    }

    /// A pointer move to a location.
    pub fn moved(location: impl Into<Point>) -> Self {
        Self {
            action: Action::Moved,
            button: Button::None,
            modifiers: key::Empty,
            location: location.into(),
        }
    }
}
