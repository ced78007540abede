//! Trigger binding: turns events on a reference element into intents.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::Intent;
use crate::{
    OverlayId, TimerId,
    core::{
        listeners::{Kind, Role, SharedListeners, Subscription, Target},
        poll::{Scheduler, Timer},
    },
};

/// How the reference element opens its overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Pointer-down on the reference toggles the overlay.
    #[default]
    Click,
    /// Pointer-enter opens; pointer-leave closes after a delay.
    Hover,
    /// Focus opens; blur closes.
    Focus,
    /// No listeners. The overlay is driven programmatically.
    Manual,
}

impl Trigger {
    /// Event kinds a reference element must listen for in this mode.
    pub fn kinds(&self) -> &'static [Kind] {
        match self {
            Self::Click => &[Kind::PointerDown],
            Self::Hover => &[Kind::PointerEnter, Kind::PointerLeave],
            Self::Focus => &[Kind::Focus, Kind::Blur],
            Self::Manual => &[],
        }
    }
}

/// Listeners bound to one overlay's reference element, plus the pending
/// hover-close timer. Holds no overlay state: it only turns events into
/// intents.
#[derive(Debug)]
pub struct TriggerBinding {
    /// Current trigger mode.
    trigger: Trigger,
    /// Reference listener, absent in manual mode.
    subscription: Option<Subscription>,
    /// Delay between pointer-leave and the close intent.
    leave_delay: Duration,
    /// Scheduled hover close, if any.
    pending_close: Option<TimerId>,
}

impl TriggerBinding {
    /// Attach the listeners for `trigger` to `owner`'s reference element.
    pub fn attach(
        listeners: &SharedListeners,
        owner: OverlayId,
        trigger: Trigger,
        leave_delay: Duration,
    ) -> Self {
        let mut binding = Self {
            trigger,
            subscription: None,
            leave_delay,
            pending_close: None,
        };
        binding.subscribe(listeners, owner);
        binding
    }

    /// Register the listener set for the current mode.
    fn subscribe(&mut self, listeners: &SharedListeners, owner: OverlayId) {
        let kinds = self.trigger.kinds();
        self.subscription = if kinds.is_empty() {
            None
        } else {
            Some(Subscription::attach(
                listeners,
                Target::Reference(owner),
                kinds,
                owner,
                Role::Trigger,
            ))
        };
    }

    /// Switch trigger mode. The old listeners are removed before the new ones
    /// are attached; rebinding to the current mode does nothing.
    pub fn rebind(
        &mut self,
        listeners: &SharedListeners,
        timers: &mut Scheduler,
        owner: OverlayId,
        trigger: Trigger,
    ) {
        if trigger == self.trigger {
            return;
        }
        self.detach(timers);
        self.trigger = trigger;
        self.subscribe(listeners, owner);
    }

    /// Remove all listeners and cancel any pending hover close.
    pub fn detach(&mut self, timers: &mut Scheduler) {
        self.cancel_pending(timers);
        self.subscription = None;
    }

    /// The current trigger mode.
    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// Is a reference listener registered?
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// The hover leave delay.
    pub fn leave_delay(&self) -> Duration {
        self.leave_delay
    }

    /// Is a hover close waiting to fire?
    pub fn has_pending_close(&self) -> bool {
        self.pending_close.is_some()
    }

    /// Cancel the pending hover close, if any.
    pub fn cancel_pending(&mut self, timers: &mut Scheduler) {
        if let Some(id) = self.pending_close.take() {
            timers.cancel(id);
        }
    }

    /// Called when a hover-close timer fires. Returns the close intent only if
    /// `timer` is the one this binding is still waiting on.
    pub fn on_timer(&mut self, timer: TimerId) -> Option<Intent> {
        if self.pending_close == Some(timer) {
            self.pending_close = None;
            Some(Intent::Close)
        } else {
            None
        }
    }

    /// React to an event delivered to the reference element.
    pub fn react(
        &mut self,
        kind: Kind,
        owner: OverlayId,
        timers: &mut Scheduler,
        now: Instant,
    ) -> Option<Intent> {
        match (self.trigger, kind) {
            (Trigger::Click, Kind::PointerDown) => Some(Intent::Toggle),
            (Trigger::Hover, Kind::PointerEnter) => {
                self.cancel_pending(timers);
                Some(Intent::Open)
            }
            (Trigger::Hover, Kind::PointerLeave) => {
                self.cancel_pending(timers);
                if self.leave_delay.is_zero() {
                    Some(Intent::Close)
                } else {
                    let id = timers.schedule(now, self.leave_delay, Timer::HoverClose(owner));
                    self.pending_close = Some(id);
                    None
                }
            }
            (Trigger::Focus, Kind::Focus) => Some(Intent::Open),
            (Trigger::Focus, Kind::Blur) => Some(Intent::Close),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;
    use crate::core::listeners::ListenerTable;

    fn owner() -> OverlayId {
        let mut map: SlotMap<OverlayId, ()> = SlotMap::with_key();
        map.insert(())
    }

    #[test]
    fn click_toggles() {
        let table = ListenerTable::shared();
        let mut timers = Scheduler::default();
        let id = owner();
        let mut b = TriggerBinding::attach(&table, id, Trigger::Click, Duration::ZERO);
        assert_eq!(table.borrow().count(Target::Reference(id)), 1);
        assert_eq!(
            b.react(Kind::PointerDown, id, &mut timers, Instant::now()),
            Some(Intent::Toggle)
        );
        assert_eq!(b.react(Kind::Focus, id, &mut timers, Instant::now()), None);
    }

    #[test]
    fn hover_leave_schedules_and_enter_cancels() {
        let table = ListenerTable::shared();
        let mut timers = Scheduler::default();
        let id = owner();
        let now = Instant::now();
        let mut b = TriggerBinding::attach(&table, id, Trigger::Hover, Duration::from_millis(100));

        assert_eq!(b.react(Kind::PointerLeave, id, &mut timers, now), None);
        assert!(b.has_pending_close());
        assert_eq!(timers.len(), 1);

        assert_eq!(
            b.react(Kind::PointerEnter, id, &mut timers, now),
            Some(Intent::Open)
        );
        assert!(!b.has_pending_close());
        assert!(timers.is_empty());
    }

    #[test]
    fn stale_timer_is_ignored() {
        let table = ListenerTable::shared();
        let mut timers = Scheduler::default();
        let id = owner();
        let now = Instant::now();
        let mut b = TriggerBinding::attach(&table, id, Trigger::Hover, Duration::from_millis(10));

        b.react(Kind::PointerLeave, id, &mut timers, now);
        let (first, _) = timers.collect(now + Duration::from_millis(10))[0];
        b.react(Kind::PointerLeave, id, &mut timers, now);
        assert_eq!(b.on_timer(first), None);
        let (second, _) = timers.collect(now + Duration::from_millis(20))[0];
        assert_eq!(b.on_timer(second), Some(Intent::Close));
    }

    #[test]
    fn rebind_swaps_listeners() {
        let table = ListenerTable::shared();
        let mut timers = Scheduler::default();
        let id = owner();
        let mut b = TriggerBinding::attach(&table, id, Trigger::Focus, Duration::ZERO);
        assert_eq!(table.borrow().count(Target::Reference(id)), 1);

        b.rebind(&table, &mut timers, id, Trigger::Manual);
        assert!(!b.is_attached());
        assert!(table.borrow().is_empty());

        b.rebind(&table, &mut timers, id, Trigger::Hover);
        assert_eq!(b.trigger(), Trigger::Hover);
        assert_eq!(
            table
                .borrow()
                .matching(Target::Reference(id), Kind::PointerLeave)
                .len(),
            1
        );
    }
}
