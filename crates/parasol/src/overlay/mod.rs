//! The overlay lifecycle: the open/closed state machine and the pieces that
//! feed it intents.

/// Outside-interaction dismissal.
pub mod dismiss;
/// Content placement relative to a reference element.
pub mod placement;
/// Trigger modes and reference listeners.
pub mod trigger;

use std::fmt;

use tracing::debug;

use self::{placement::Placement, trigger::Trigger};

/// A request to change an overlay's visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Become open.
    Open,
    /// Become closed.
    Close,
    /// Flip the current state.
    Toggle,
}

/// Observable state of one overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayState {
    /// Is the overlay visible?
    pub is_open: bool,
    /// Placement passed to the style resolver on every render.
    pub placement: Placement,
    /// Active trigger mode.
    pub trigger: Trigger,
}

/// Visibility change callback.
pub type OpenChangeFn = Box<dyn FnMut(bool)>;

/// The single owner of an overlay's `is_open` flag. All visibility changes go
/// through [`Machine::apply`], which absorbs redundant intents and reports
/// each actual change exactly once.
pub struct Machine {
    /// Current state.
    state: OverlayState,
    /// Called once per actual change.
    on_open_change: Option<OpenChangeFn>,
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("state", &self.state)
            .field("on_open_change", &self.on_open_change.is_some())
            .finish()
    }
}

impl Machine {
    /// A closed machine.
    pub fn new(placement: Placement, trigger: Trigger) -> Self {
        Self {
            state: OverlayState {
                is_open: false,
                placement,
                trigger,
            },
            on_open_change: None,
        }
    }

    /// Attach a change callback.
    pub fn with_on_open_change(mut self, f: impl FnMut(bool) + 'static) -> Self {
        self.on_open_change = Some(Box::new(f));
        self
    }

    /// Replace the change callback.
    pub fn set_on_open_change(&mut self, f: Option<OpenChangeFn>) {
        self.on_open_change = f;
    }

    /// Set the initial visibility without notifying. Only meaningful before
    /// the overlay is mounted.
    pub fn with_initial_open(mut self, open: bool) -> Self {
        self.state.is_open = open;
        self
    }

    /// Current state.
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Is the overlay open?
    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Record a trigger mode change.
    pub fn set_trigger(&mut self, trigger: Trigger) {
        self.state.trigger = trigger;
    }

    /// Apply an intent. Returns the new visibility if it changed, or `None`
    /// if the intent was absorbed.
    pub fn apply(&mut self, intent: Intent) -> Option<bool> {
        let next = match intent {
            Intent::Open => true,
            Intent::Close => false,
            Intent::Toggle => !self.state.is_open,
        };
        if next == self.state.is_open {
            return None;
        }
        self.state.is_open = next;
        debug!(?intent, is_open = next, "overlay transition");
        if let Some(f) = self.on_open_change.as_mut() {
            f(next);
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use proptest::prelude::*;

    use super::*;

    fn recording() -> (Machine, Rc<RefCell<Vec<bool>>>) {
        let log = Rc::new(RefCell::new(vec![]));
        let sink = log.clone();
        let m = Machine::new(Placement::Top, Trigger::Click)
            .with_on_open_change(move |v| sink.borrow_mut().push(v));
        (m, log)
    }

    #[test]
    fn redundant_intents_are_absorbed() {
        let (mut m, log) = recording();
        assert_eq!(m.apply(Intent::Close), None);
        assert_eq!(m.apply(Intent::Open), Some(true));
        assert_eq!(m.apply(Intent::Open), None);
        assert_eq!(m.apply(Intent::Toggle), Some(false));
        assert_eq!(m.apply(Intent::Close), None);
        assert_eq!(*log.borrow(), vec![true, false]);
    }

    #[test]
    fn initial_open_is_silent() {
        let (m, log) = recording();
        let m = m.with_initial_open(true);
        assert!(m.is_open());
        assert!(log.borrow().is_empty());
    }

    fn intent() -> impl Strategy<Value = Intent> {
        prop_oneof![
            Just(Intent::Open),
            Just(Intent::Close),
            Just(Intent::Toggle)
        ]
    }

    proptest! {
        #[test]
        fn callback_fires_once_per_change(intents in prop::collection::vec(intent(), 0..64)) {
            let (mut m, log) = recording();
            let mut expected = vec![];
            let mut open = false;
            for i in intents {
                let next = match i {
                    Intent::Open => true,
                    Intent::Close => false,
                    Intent::Toggle => !open,
                };
                if next != open {
                    expected.push(next);
                    open = next;
                }
                m.apply(i);
            }
            prop_assert_eq!(&*log.borrow(), &expected);
            prop_assert_eq!(m.is_open(), open);
            for w in log.borrow().windows(2) {
                prop_assert_ne!(w[0], w[1]);
            }
        }
    }
}
