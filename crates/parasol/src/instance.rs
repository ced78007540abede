//! Registry for overlays opened imperatively, outside the declarative tree.
//!
//! Callers hold a [`Handle`] and push changes into a [`Registry`]. The
//! registry never touches the stage: a rendering-layer subscriber drains the
//! change queue and reconciles it into mounted overlays (see
//! [`crate::widgets::modal::StaticModals`]).

use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::{Rc, Weak},
};

use slotmap::SlotMap;
use tracing::debug;

use crate::{InstanceId, OverlayId};

/// Props that accept a partial update.
pub trait Mergeable {
    /// A partial set of props. Absent fields leave the current value alone.
    type Patch;

    /// Shallow-merge a patch into these props.
    fn merge(&mut self, patch: Self::Patch);
}

/// Lifecycle phase of an instance slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Shown, accepting updates.
    Open,
    /// Close requested; the slot is released once its overlay is gone.
    Closing,
}

/// A queued registry change for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A new instance needs an overlay.
    Mounted(InstanceId),
    /// Props changed.
    Updated(InstanceId),
    /// Close was requested.
    Closing(InstanceId),
}

/// One registered instance.
#[derive(Debug)]
struct Slot<P> {
    /// Current props.
    props: P,
    /// Lifecycle phase.
    phase: Phase,
    /// Incremented on every accepted update.
    revision: u64,
    /// The overlay rendering this instance, once mounted.
    overlay: Option<OverlayId>,
}

/// Instance slots and the queue of changes not yet rendered.
#[derive(Debug)]
pub struct Registry<P> {
    /// Slot arena.
    slots: SlotMap<InstanceId, Slot<P>>,
    /// Pending changes, oldest first.
    changes: VecDeque<Change>,
}

/// A registry shared between handles and the rendering layer.
pub type SharedRegistry<P> = Rc<RefCell<Registry<P>>>;

impl<P> Default for Registry<P> {
    fn default() -> Self {
        Self {
            slots: SlotMap::with_key(),
            changes: VecDeque::new(),
        }
    }
}

impl<P: Mergeable> Registry<P> {
    /// An empty shared registry.
    pub fn shared() -> SharedRegistry<P> {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Allocate a slot.
    pub fn register(&mut self, props: P) -> InstanceId {
        let id = self.slots.insert(Slot {
            props,
            phase: Phase::Open,
            revision: 0,
            overlay: None,
        });
        self.changes.push_back(Change::Mounted(id));
        debug!(?id, "instance registered");
        id
    }

    /// Merge a patch into an open slot. Returns false for closing or released
    /// slots, which are left untouched.
    pub fn update(&mut self, id: InstanceId, patch: P::Patch) -> bool {
        let Some(slot) = self.slots.get_mut(id) else {
            return false;
        };
        if slot.phase != Phase::Open {
            return false;
        }
        slot.props.merge(patch);
        slot.revision += 1;
        self.changes.push_back(Change::Updated(id));
        true
    }

    /// Move an open slot to closing. Returns false if it was not open.
    pub fn request_close(&mut self, id: InstanceId) -> bool {
        let Some(slot) = self.slots.get_mut(id) else {
            return false;
        };
        if slot.phase != Phase::Open {
            return false;
        }
        slot.phase = Phase::Closing;
        self.changes.push_back(Change::Closing(id));
        debug!(?id, "instance closing");
        true
    }

    /// Release a slot, returning its final props.
    pub fn unregister(&mut self, id: InstanceId) -> Option<P> {
        let slot = self.slots.remove(id)?;
        debug!(?id, "instance released");
        Some(slot.props)
    }

    /// Record the overlay that renders a slot.
    pub fn bind(&mut self, id: InstanceId, overlay: OverlayId) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.overlay = Some(overlay);
        }
    }

    /// Current props.
    pub fn props(&self, id: InstanceId) -> Option<&P> {
        self.slots.get(id).map(|s| &s.props)
    }

    /// Lifecycle phase.
    pub fn phase(&self, id: InstanceId) -> Option<Phase> {
        self.slots.get(id).map(|s| s.phase)
    }

    /// Number of accepted updates.
    pub fn revision(&self, id: InstanceId) -> Option<u64> {
        self.slots.get(id).map(|s| s.revision)
    }

    /// The overlay rendering a slot.
    pub fn overlay(&self, id: InstanceId) -> Option<OverlayId> {
        self.slots.get(id).and_then(|s| s.overlay)
    }

    /// Does the slot exist?
    pub fn contains(&self, id: InstanceId) -> bool {
        self.slots.contains_key(id)
    }

    /// Ids of all slots in a phase.
    pub fn in_phase(&self, phase: Phase) -> Vec<InstanceId> {
        self.slots
            .iter()
            .filter(|(_, s)| s.phase == phase)
            .map(|(id, _)| id)
            .collect()
    }

    /// Take every queued change.
    pub fn drain_changes(&mut self) -> Vec<Change> {
        self.changes.drain(..).collect()
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Are there no live slots?
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Imperative handle to one instance. Operations on a closed or released
/// instance, or after the registry is gone, do nothing.
#[derive(Debug)]
pub struct Handle<P> {
    /// Instance slot.
    id: InstanceId,
    /// Owning registry.
    registry: Weak<RefCell<Registry<P>>>,
}

impl<P> Clone for Handle<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            registry: self.registry.clone(),
        }
    }
}

impl<P: Mergeable> Handle<P> {
    /// Register `props` and return a handle to the new slot.
    pub fn open(registry: &SharedRegistry<P>, props: P) -> Self {
        let id = registry.borrow_mut().register(props);
        Self {
            id,
            registry: Rc::downgrade(registry),
        }
    }

    /// The instance id.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Shallow-merge a partial update.
    pub fn update(&self, patch: P::Patch) {
        if let Some(r) = self.registry.upgrade() {
            r.borrow_mut().update(self.id, patch);
        }
    }

    /// Request close.
    pub fn close(&self) {
        if let Some(r) = self.registry.upgrade() {
            r.borrow_mut().request_close(self.id);
        }
    }

    /// Has this instance closed or been released?
    pub fn is_closed(&self) -> bool {
        let Some(r) = self.registry.upgrade() else {
            return true;
        };
        let phase = r.borrow().phase(self.id);
        phase.is_none_or(|p| p == Phase::Closing)
    }

    /// A copy of the current props, if the slot is live.
    pub fn props(&self) -> Option<P>
    where
        P: Clone,
    {
        let r = self.registry.upgrade()?;
        let props = r.borrow().props(self.id).cloned();
        props
    }
}
