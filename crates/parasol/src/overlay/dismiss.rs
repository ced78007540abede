//! Outside-interaction dismissal.
//!
//! A watcher holds a document listener exactly while its overlay is open. The
//! listener is registered on the open transition and dropped on the close
//! transition, so sibling overlays each hold their own registration.

use serde::{Deserialize, Serialize};

use crate::{
    OverlayId,
    core::listeners::{Kind, Role, SharedListeners, Subscription, Target},
    event::key::Key,
    geom::{Point, Rect},
};

/// Document events a watcher listens for.
const DOCUMENT_KINDS: &[Kind] = &[Kind::PointerDown, Kind::KeyDown];

/// Which outside interactions close the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DismissConfig {
    /// Close on pointer-down outside the reference and content.
    pub close_on_backdrop: bool,
    /// Close on Escape.
    pub close_on_esc: bool,
}

impl Default for DismissConfig {
    fn default() -> Self {
        Self {
            close_on_backdrop: true,
            close_on_esc: true,
        }
    }
}

/// Is `p` outside both the reference and the content?
pub fn is_outside(p: Point, reference: Option<Rect>, content: Rect) -> bool {
    !content.contains_point(p) && !reference.is_some_and(|r| r.contains_point(p))
}

/// Watches the document for interactions that dismiss one overlay.
#[derive(Debug, Default)]
pub struct DismissalWatcher {
    /// Dismissal gates.
    config: DismissConfig,
    /// Document listener, present iff the overlay is open.
    subscription: Option<Subscription>,
}

impl DismissalWatcher {
    /// A watcher with no listener registered.
    pub fn new(config: DismissConfig) -> Self {
        Self {
            config,
            subscription: None,
        }
    }

    /// Current gates.
    pub fn config(&self) -> DismissConfig {
        self.config
    }

    /// Change the gates. Registration is unaffected.
    pub fn set_config(&mut self, config: DismissConfig) {
        self.config = config;
    }

    /// Is a document listener registered?
    pub fn is_watching(&self) -> bool {
        self.subscription.is_some()
    }

    /// Bring the registration in line with `is_open`: register if open and
    /// not registered, drop the listener if closed. Never registers twice.
    pub fn sync(&mut self, listeners: &SharedListeners, owner: OverlayId, is_open: bool) {
        match (is_open, self.subscription.is_some()) {
            (true, false) => {
                self.subscription = Some(Subscription::attach(
                    listeners,
                    Target::Document,
                    DOCUMENT_KINDS,
                    owner,
                    Role::Dismiss,
                ));
            }
            (false, true) => self.subscription = None,
            _ => {}
        }
    }

    /// Does a pointer-down at `p` dismiss the overlay?
    pub fn qualifies_pointer(&self, p: Point, reference: Option<Rect>, content: Rect) -> bool {
        self.is_watching() && self.config.close_on_backdrop && is_outside(p, reference, content)
    }

    /// Does this key dismiss the overlay?
    pub fn qualifies_key(&self, key: &Key) -> bool {
        self.is_watching() && self.config.close_on_esc && key.is_escape()
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;
    use crate::{core::listeners::ListenerTable, event::key::KeyCode};

    fn owners() -> (OverlayId, OverlayId) {
        let mut map: SlotMap<OverlayId, ()> = SlotMap::with_key();
        (map.insert(()), map.insert(()))
    }

    #[test]
    fn registered_iff_open() {
        let (a, _) = owners();
        let table = ListenerTable::shared();
        let mut w = DismissalWatcher::default();

        w.sync(&table, a, true);
        w.sync(&table, a, true);
        assert_eq!(table.borrow().count(Target::Document), 1);
        w.sync(&table, a, false);
        assert_eq!(table.borrow().count(Target::Document), 0);
        w.sync(&table, a, false);
        assert!(!w.is_watching());
    }

    #[test]
    fn siblings_keep_their_registration() {
        let (a, b) = owners();
        let table = ListenerTable::shared();
        let mut wa = DismissalWatcher::default();
        let mut wb = DismissalWatcher::default();
        wa.sync(&table, a, true);
        wb.sync(&table, b, true);
        wa.sync(&table, a, false);
        assert_eq!(table.borrow().count_owned(b, Target::Document), 1);
        drop(wb);
        assert!(table.borrow().is_empty());
    }

    #[test]
    fn gates() {
        let (a, _) = owners();
        let table = ListenerTable::shared();
        let content = Rect::new(10, 10, 5, 5);
        let reference = Some(Rect::new(0, 0, 3, 1));
        let mut w = DismissalWatcher::new(DismissConfig {
            close_on_backdrop: false,
            close_on_esc: true,
        });
        assert!(!w.qualifies_key(&KeyCode::Esc.into()));

        w.sync(&table, a, true);
        assert!(w.qualifies_key(&KeyCode::Esc.into()));
        assert!(!w.qualifies_key(&'q'.into()));
        assert!(!w.qualifies_pointer(Point::new(50, 50), reference, content));

        w.set_config(DismissConfig::default());
        assert!(w.qualifies_pointer(Point::new(50, 50), reference, content));
        assert!(!w.qualifies_pointer(Point::new(11, 11), reference, content));
        assert!(!w.qualifies_pointer(Point::new(1, 0), reference, content));
    }
}
