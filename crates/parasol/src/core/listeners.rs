//! Listener registration for reference elements and the document.
//!
//! Every listener is owned by exactly one overlay and is held alive by a
//! [`Subscription`]. Dropping the subscription removes the listener, so a
//! listener can never outlive the component that registered it, whatever path
//! the component takes out of existence.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use slotmap::SlotMap;
use tracing::trace;

use crate::{ListenerId, OverlayId};

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The document-level target shared by all overlays.
    Document,
    /// The reference (trigger) element of an overlay.
    Reference(OverlayId),
}

/// Event kinds a listener can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A pointer button was pressed.
    PointerDown,
    /// The pointer entered the hover region.
    PointerEnter,
    /// The pointer left the hover region.
    PointerLeave,
    /// The element gained focus.
    Focus,
    /// The element lost focus.
    Blur,
    /// A key was pressed.
    KeyDown,
}

/// What the listener is for. The stage routes deliveries by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Trigger binding on a reference element.
    Trigger,
    /// Outside-interaction dismissal on the document.
    Dismiss,
}

/// A single registered listener.
#[derive(Debug)]
struct Listener {
    /// Attachment point.
    target: Target,
    /// Event kinds received.
    kinds: &'static [Kind],
    /// Overlay that owns the listener.
    owner: OverlayId,
    /// Listener role.
    role: Role,
    /// Registration sequence, used to deliver in registration order.
    seq: u64,
}

/// A listener matched for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Listener identifier.
    pub id: ListenerId,
    /// Overlay that owns the listener.
    pub owner: OverlayId,
    /// Listener role.
    pub role: Role,
}

/// Registry of all live listeners.
#[derive(Debug, Default)]
pub struct ListenerTable {
    /// Listener arena.
    listeners: SlotMap<ListenerId, Listener>,
    /// Next registration sequence number.
    next_seq: u64,
}

/// A listener table shared between the stage and the subscriptions it hands
/// out.
pub type SharedListeners = Rc<RefCell<ListenerTable>>;

impl ListenerTable {
    /// Construct an empty shared table.
    pub fn shared() -> SharedListeners {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Register a listener.
    fn insert(
        &mut self,
        target: Target,
        kinds: &'static [Kind],
        owner: OverlayId,
        role: Role,
    ) -> ListenerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.listeners.insert(Listener {
            target,
            kinds,
            owner,
            role,
            seq,
        })
    }

    /// Remove a listener. Returns true if it was present.
    fn remove(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    /// Number of live listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Number of listeners attached to a target.
    pub fn count(&self, target: Target) -> usize {
        self.listeners
            .values()
            .filter(|l| l.target == target)
            .count()
    }

    /// Number of listeners an overlay holds on a target.
    pub fn count_owned(&self, owner: OverlayId, target: Target) -> usize {
        self.listeners
            .values()
            .filter(|l| l.owner == owner && l.target == target)
            .count()
    }

    /// Listeners on `target` that receive `kind`, in registration order.
    pub fn matching(&self, target: Target, kind: Kind) -> Vec<Match> {
        let mut found: Vec<(u64, Match)> = self
            .listeners
            .iter()
            .filter(|(_, l)| l.target == target && l.kinds.contains(&kind))
            .map(|(id, l)| {
                (
                    l.seq,
                    Match {
                        id,
                        owner: l.owner,
                        role: l.role,
                    },
                )
            })
            .collect();
        found.sort_by_key(|(seq, _)| *seq);
        found.into_iter().map(|(_, m)| m).collect()
    }

    /// Is the listener still registered?
    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(id)
    }
}

/// Handle for a registered listener. The listener is removed when the handle
/// is dropped.
#[derive(Debug)]
pub struct Subscription {
    /// Registered listener.
    id: ListenerId,
    /// Table the listener lives in.
    table: Weak<RefCell<ListenerTable>>,
}

impl Subscription {
    /// Register a listener and return the handle that keeps it alive.
    pub fn attach(
        table: &SharedListeners,
        target: Target,
        kinds: &'static [Kind],
        owner: OverlayId,
        role: Role,
    ) -> Self {
        let id = table.borrow_mut().insert(target, kinds, owner, role);
        trace!(?id, ?target, ?role, "listener attached");
        Self {
            id,
            table: Rc::downgrade(table),
        }
    }

    /// The registered listener.
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(table) = self.table.upgrade() else {
            return;
        };
        if table.borrow_mut().remove(self.id) {
            trace!(id = ?self.id, "listener detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    const CLICK: &[Kind] = &[Kind::PointerDown];
    const DOC: &[Kind] = &[Kind::PointerDown, Kind::KeyDown];

    fn owners() -> (OverlayId, OverlayId) {
        let mut map: SlotMap<OverlayId, ()> = SlotMap::with_key();
        (map.insert(()), map.insert(()))
    }

    #[test]
    fn subscription_detaches_on_drop() {
        let (a, _) = owners();
        let table = ListenerTable::shared();
        let sub = Subscription::attach(&table, Target::Document, DOC, a, Role::Dismiss);
        assert_eq!(table.borrow().count(Target::Document), 1);
        assert!(table.borrow().contains(sub.id()));
        drop(sub);
        assert!(table.borrow().is_empty());
    }

    #[test]
    fn siblings_are_independent() {
        let (a, b) = owners();
        let table = ListenerTable::shared();
        let sa = Subscription::attach(&table, Target::Document, DOC, a, Role::Dismiss);
        let sb = Subscription::attach(&table, Target::Document, DOC, b, Role::Dismiss);
        drop(sa);
        assert_eq!(table.borrow().count(Target::Document), 1);
        assert_eq!(table.borrow().count_owned(b, Target::Document), 1);
        assert_eq!(table.borrow().count_owned(a, Target::Document), 0);
        drop(sb);
        assert!(table.borrow().is_empty());
    }

    #[test]
    fn matching_respects_target_kind_and_order() {
        let (a, b) = owners();
        let table = ListenerTable::shared();
        let _sb = Subscription::attach(&table, Target::Document, DOC, b, Role::Dismiss);
        let _sa = Subscription::attach(&table, Target::Document, DOC, a, Role::Dismiss);
        let _click = Subscription::attach(&table, Target::Reference(a), CLICK, a, Role::Trigger);

        let owners: Vec<_> = table
            .borrow()
            .matching(Target::Document, Kind::KeyDown)
            .iter()
            .map(|m| m.owner)
            .collect();
        assert_eq!(owners, vec![b, a]);

        assert!(
            table
                .borrow()
                .matching(Target::Reference(a), Kind::KeyDown)
                .is_empty()
        );
        assert_eq!(
            table
                .borrow()
                .matching(Target::Reference(a), Kind::PointerDown)
                .len(),
            1
        );
    }

    #[test]
    fn subscription_outliving_table_is_harmless() {
        let (a, _) = owners();
        let table = ListenerTable::shared();
        let sub = Subscription::attach(&table, Target::Document, DOC, a, Role::Dismiss);
        drop(table);
        drop(sub);
    }
}
