use std::{
    any::{Any, type_name},
    time::{Duration, Instant},
};

use futures::{
    FutureExt, StreamExt,
    future::LocalBoxFuture,
    stream::FuturesUnordered,
};
use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use super::{
    listeners::{Kind, ListenerTable, Role, SharedListeners, Target},
    poll::{Scheduler, Timer},
    settings::Settings,
};
use crate::{
    OverlayId, TimerId,
    action::{ActionKind, ActionState, Completion, Invocation, Settlement},
    error::{Error, Result},
    event::{
        Event,
        key::Key,
        mouse::{Action, MouseEvent},
    },
    geom::{Expanse, Point, Rect},
    overlay::{
        Intent, Machine, OpenChangeFn, OverlayState,
        dismiss::{DismissConfig, DismissalWatcher},
        placement::Placement,
        trigger::{Trigger, TriggerBinding},
    },
    render::{OverlayFrame, OverlayRenderer, Render},
    style::StyleResolver,
    widget::Widget,
};

/// What an overlay's content is positioned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// A reference element. Trigger listeners attach here.
    Reference(Rect),
    /// The viewport center. Used by modals, which have no reference.
    Viewport,
}

/// Mount options for one overlay. Unset options take the stage's
/// [`Settings`].
pub struct OverlaySpec {
    /// Positioning anchor.
    anchor: Anchor,
    /// Placement override.
    placement: Option<Placement>,
    /// Trigger override.
    trigger: Option<Trigger>,
    /// Escape gate override.
    close_on_esc: Option<bool>,
    /// Backdrop gate override.
    close_on_backdrop: Option<bool>,
    /// Hover leave delay override.
    leave_delay: Option<Duration>,
    /// Offset override.
    offset: Option<u32>,
    /// Initial visibility.
    open: bool,
    /// Visibility change callback.
    on_open_change: Option<OpenChangeFn>,
}

impl OverlaySpec {
    /// An overlay positioned against a reference element.
    pub fn anchored(reference: Rect) -> Self {
        Self::with_anchor(Anchor::Reference(reference))
    }

    /// An overlay centered in the viewport, driven programmatically.
    pub fn centered() -> Self {
        Self::with_anchor(Anchor::Viewport).with_trigger(Trigger::Manual)
    }

    /// Options with nothing overridden.
    fn with_anchor(anchor: Anchor) -> Self {
        Self {
            anchor,
            placement: None,
            trigger: None,
            close_on_esc: None,
            close_on_backdrop: None,
            leave_delay: None,
            offset: None,
            open: false,
            on_open_change: None,
        }
    }

    /// Set the placement.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    /// Set the trigger mode.
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Close on Escape?
    pub fn with_close_on_esc(mut self, v: bool) -> Self {
        self.close_on_esc = Some(v);
        self
    }

    /// Close on outside pointer-down?
    pub fn with_close_on_backdrop(mut self, v: bool) -> Self {
        self.close_on_backdrop = Some(v);
        self
    }

    /// Set both dismissal gates.
    pub fn with_dismiss(self, config: DismissConfig) -> Self {
        self.with_close_on_esc(config.close_on_esc)
            .with_close_on_backdrop(config.close_on_backdrop)
    }

    /// Set the hover leave delay.
    pub fn with_leave_delay(mut self, delay: Duration) -> Self {
        self.leave_delay = Some(delay);
        self
    }

    /// Set the gap between reference and content.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Mount already open. The change callback is not called for the initial
    /// state.
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Set the visibility change callback.
    pub fn with_on_open_change(mut self, f: impl FnMut(bool) + 'static) -> Self {
        self.on_open_change = Some(Box::new(f));
        self
    }
}

/// A mounted overlay.
struct OverlayNode {
    /// Content.
    widget: Box<dyn Widget>,
    /// Visibility owner.
    machine: Machine,
    /// Reference listeners.
    binding: TriggerBinding,
    /// Document listener while open.
    watcher: DismissalWatcher,
    /// Positioning anchor.
    anchor: Anchor,
    /// Gap between reference and content.
    offset: u32,
    /// Is the pointer inside the hover region?
    hovered: bool,
    /// Scheduled deferred unmount.
    pending_unmount: Option<TimerId>,
}

impl OverlayNode {
    /// The reference rectangle, if anchored to one.
    fn reference(&self) -> Option<Rect> {
        match self.anchor {
            Anchor::Reference(r) => Some(r),
            Anchor::Viewport => None,
        }
    }

    /// The computed content rectangle.
    fn area(&self, viewport: Expanse) -> Rect {
        let size = self.widget.content_size();
        match self.anchor {
            Anchor::Reference(r) => self.machine.state().placement.position(r, size, self.offset),
            Anchor::Viewport => size.centered_in(viewport.at(Point::zero())),
        }
    }

    /// The region that counts as "inside" for hover: the reference, plus the
    /// content while open.
    fn in_hover_region(&self, p: Point, viewport: Expanse) -> bool {
        self.reference().is_some_and(|r| r.contains_point(p))
            || (self.machine.is_open() && self.area(viewport).contains_point(p))
    }
}

/// An action that has not settled yet.
type InFlight = LocalBoxFuture<'static, (OverlayId, Completion)>;

/// The host for mounted overlays: owns their state machines, the shared
/// listener table, the timer heap and in-flight actions, and is the single
/// entry point for events, time and rendering.
pub struct Stage {
    /// Mounted overlays.
    nodes: SlotMap<OverlayId, OverlayNode>,
    /// Reference and document listeners.
    listeners: SharedListeners,
    /// Hover-close and deferred-unmount timers.
    timers: Scheduler,
    /// Pending confirm/cancel actions.
    actions: FuturesUnordered<InFlight>,
    /// Current time. Only moves forward.
    now: Instant,
    /// Defaults for new overlays.
    settings: Settings,
    /// Viewport size, used to center modals.
    viewport: Expanse,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    /// A stage with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// A stage with the given defaults.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            listeners: ListenerTable::shared(),
            timers: Scheduler::default(),
            actions: FuturesUnordered::new(),
            now: Instant::now(),
            settings,
            viewport: Expanse::new(80, 24),
        }
    }

    /// Stage defaults.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Set the viewport size.
    pub fn set_viewport(&mut self, viewport: Expanse) {
        self.viewport = viewport;
    }

    /// The viewport size.
    pub fn viewport(&self) -> Expanse {
        self.viewport
    }

    /// Mount an overlay. Listeners for its trigger mode are attached at once;
    /// a dismissal listener is attached if it mounts open.
    pub fn mount(&mut self, widget: impl Into<Box<dyn Widget>>, spec: OverlaySpec) -> OverlayId {
        let widget = widget.into();
        let trigger = spec.trigger.unwrap_or(self.settings.trigger);
        let placement = spec.placement.unwrap_or(self.settings.placement);
        let leave_delay = spec
            .leave_delay
            .unwrap_or_else(|| self.settings.hover_leave_delay());
        let dismiss = DismissConfig {
            close_on_backdrop: spec
                .close_on_backdrop
                .unwrap_or(self.settings.close_on_backdrop),
            close_on_esc: spec.close_on_esc.unwrap_or(self.settings.close_on_esc),
        };
        let offset = spec.offset.unwrap_or(self.settings.offset);
        let mut machine = Machine::new(placement, trigger).with_initial_open(spec.open);
        machine.set_on_open_change(spec.on_open_change);
        let name = widget.name();

        let listeners = &self.listeners;
        let id = self.nodes.insert_with_key(|id| OverlayNode {
            widget,
            machine,
            binding: TriggerBinding::attach(listeners, id, trigger, leave_delay),
            watcher: DismissalWatcher::new(dismiss),
            anchor: spec.anchor,
            offset,
            hovered: false,
            pending_unmount: None,
        });
        if let Some(node) = self.nodes.get_mut(id) {
            node.watcher
                .sync(&self.listeners, id, node.machine.is_open());
        }
        debug!(?id, widget = %name, ?trigger, ?placement, open = spec.open, "overlay mounted");
        id
    }

    /// Unmount an overlay, removing all of its listeners and timers.
    pub fn unmount(&mut self, id: OverlayId) -> Result<()> {
        let mut node = self.nodes.remove(id).ok_or_else(|| not_found(id))?;
        node.binding.detach(&mut self.timers);
        if let Some(t) = node.pending_unmount.take() {
            self.timers.cancel(t);
        }
        node.widget.on_unmount();
        debug!(?id, "overlay unmounted");
        Ok(())
    }

    /// Unmount an overlay once `delay` has elapsed. Scheduling again replaces
    /// the earlier deadline.
    pub fn unmount_after(&mut self, id: OverlayId, delay: Duration) -> Result<TimerId> {
        let node = self.nodes.get_mut(id).ok_or_else(|| not_found(id))?;
        if let Some(t) = node.pending_unmount.take() {
            self.timers.cancel(t);
        }
        let t = self.timers.schedule(self.now, delay, Timer::Unmount(id));
        node.pending_unmount = Some(t);
        Ok(t)
    }

    /// Is the overlay mounted?
    pub fn contains(&self, id: OverlayId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of mounted overlays.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Are no overlays mounted?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// State of a mounted overlay.
    pub fn state(&self, id: OverlayId) -> Result<OverlayState> {
        self.nodes
            .get(id)
            .map(|n| n.machine.state())
            .ok_or_else(|| not_found(id))
    }

    /// Is the overlay mounted and open?
    pub fn is_open(&self, id: OverlayId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.machine.is_open())
    }

    /// Computed content rectangle of an overlay.
    pub fn area(&self, id: OverlayId) -> Result<Rect> {
        self.nodes
            .get(id)
            .map(|n| n.area(self.viewport))
            .ok_or_else(|| not_found(id))
    }

    /// Apply an intent programmatically. Returns true if visibility changed.
    pub fn apply(&mut self, id: OverlayId, intent: Intent) -> Result<bool> {
        if !self.contains(id) {
            return Err(not_found(id));
        }
        Ok(self.transition(id, intent))
    }

    /// Open an overlay. Opening an open overlay does nothing.
    pub fn open(&mut self, id: OverlayId) -> Result<bool> {
        self.apply(id, Intent::Open)
    }

    /// Close an overlay. Closing a closed overlay does nothing.
    pub fn close(&mut self, id: OverlayId) -> Result<bool> {
        self.apply(id, Intent::Close)
    }

    /// Flip an overlay's visibility.
    pub fn toggle(&mut self, id: OverlayId) -> Result<bool> {
        self.apply(id, Intent::Toggle)
    }

    /// Route an intent through the overlay's state machine and bring its
    /// dismissal listener in line with the result.
    fn transition(&mut self, id: OverlayId, intent: Intent) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        let Some(open) = node.machine.apply(intent) else {
            return false;
        };
        node.watcher.sync(&self.listeners, id, open);
        if !open {
            node.binding.cancel_pending(&mut self.timers);
        }
        true
    }

    /// Switch an overlay's trigger mode.
    pub fn set_trigger(&mut self, id: OverlayId, trigger: Trigger) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or_else(|| not_found(id))?;
        node.binding
            .rebind(&self.listeners, &mut self.timers, id, trigger);
        node.machine.set_trigger(trigger);
        Ok(())
    }

    /// Move an overlay's reference element.
    pub fn set_reference(&mut self, id: OverlayId, reference: Rect) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or_else(|| not_found(id))?;
        node.anchor = Anchor::Reference(reference);
        Ok(())
    }

    /// Change an overlay's dismissal gates.
    pub fn set_dismiss(&mut self, id: OverlayId, config: DismissConfig) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or_else(|| not_found(id))?;
        node.watcher.set_config(config);
        Ok(())
    }

    /// Run a closure with mutable access to an overlay's widget of type `W`.
    pub fn with_widget<W, R>(&mut self, id: OverlayId, f: impl FnOnce(&mut W) -> R) -> Result<R>
    where
        W: Widget + 'static,
    {
        let node = self.nodes.get_mut(id).ok_or_else(|| not_found(id))?;
        let any = node.widget.as_mut() as &mut dyn Any;
        let widget = any
            .downcast_mut::<W>()
            .ok_or_else(|| Error::Invalid(format!("expected widget type {}", type_name::<W>())))?;
        Ok(f(widget))
    }

    /// Number of listeners attached to a target.
    pub fn listener_count(&self, target: Target) -> usize {
        self.listeners.borrow().count(target)
    }

    /// Number of listeners across all targets.
    pub fn listener_total(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Dispatch a raw event.
    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::Key(k) => self.key(k),
            Event::Mouse(m) => self.mouse(m),
            Event::Focus(id) => self.focus(id),
            Event::Blur(id) => self.blur(id),
        }
    }

    /// Dispatch a key-down to the document.
    pub fn key(&mut self, k: impl Into<Key>) {
        let k = k.into();
        trace!(?k, "key");
        let matches = self
            .listeners
            .borrow()
            .matching(Target::Document, Kind::KeyDown);
        for m in matches.into_iter().filter(|m| m.role == Role::Dismiss) {
            let qualifies = self
                .nodes
                .get(m.owner)
                .is_some_and(|n| n.watcher.qualifies_key(&k));
            if qualifies {
                debug!(id = ?m.owner, "dismissed by escape");
                self.transition(m.owner, Intent::Close);
            }
        }
    }

    /// Dispatch a pointer event.
    pub fn mouse(&mut self, m: MouseEvent) {
        if m.action.is_motion() {
            self.hover(m.location);
        }
        if m.action == Action::Down {
            self.pointer_down(m.location);
        }
    }

    /// The reference element of `id` gained focus.
    pub fn focus(&mut self, id: OverlayId) {
        self.deliver(id, Kind::Focus);
    }

    /// The reference element of `id` lost focus.
    pub fn blur(&mut self, id: OverlayId) {
        self.deliver(id, Kind::Blur);
    }

    /// Deliver an element event to the trigger listeners on a reference.
    fn deliver(&mut self, id: OverlayId, kind: Kind) {
        let matches = self.listeners.borrow().matching(Target::Reference(id), kind);
        for m in matches.into_iter().filter(|m| m.role == Role::Trigger) {
            let intent = match self.nodes.get_mut(m.owner) {
                Some(node) => node.binding.react(kind, m.owner, &mut self.timers, self.now),
                None => None,
            };
            if let Some(intent) = intent {
                trace!(id = ?m.owner, ?kind, ?intent, "trigger");
                self.transition(m.owner, intent);
            }
        }
    }

    /// A pointer press. The document listeners are snapshotted before the
    /// element phase, so a watcher installed by this press does not see it.
    fn pointer_down(&mut self, p: Point) {
        let snapshot = self
            .listeners
            .borrow()
            .matching(Target::Document, Kind::PointerDown);

        let hit: Vec<OverlayId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.reference().is_some_and(|r| r.contains_point(p)))
            .map(|(id, _)| id)
            .collect();
        for id in hit {
            self.deliver(id, Kind::PointerDown);
        }

        for m in snapshot.into_iter().filter(|m| m.role == Role::Dismiss) {
            let qualifies = self.nodes.get(m.owner).is_some_and(|n| {
                n.watcher
                    .qualifies_pointer(p, n.reference(), n.area(self.viewport))
            });
            if qualifies {
                debug!(id = ?m.owner, "dismissed by outside press");
                self.transition(m.owner, Intent::Close);
            }
        }
    }

    /// Pointer motion. Synthesizes enter and leave for every overlay whose
    /// hover region the pointer crossed.
    fn hover(&mut self, p: Point) {
        let viewport = self.viewport;
        let mut crossed = vec![];
        for (id, node) in self.nodes.iter_mut() {
            let inside = node.in_hover_region(p, viewport);
            if inside != node.hovered {
                node.hovered = inside;
                crossed.push((
                    id,
                    if inside {
                        Kind::PointerEnter
                    } else {
                        Kind::PointerLeave
                    },
                ));
            }
        }
        for (id, kind) in crossed {
            self.deliver(id, kind);
        }
    }

    /// Current stage time.
    pub fn now(&self) -> Instant {
        self.now
    }

    /// The earliest timer deadline, if any.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// How long a host loop may sleep before the next timer is due.
    pub fn current_wait(&mut self) -> Option<Duration> {
        self.timers.current_wait(self.now)
    }

    /// Number of timers waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Advance time to `now` and fire every timer that is due. Time never
    /// moves backwards.
    pub fn tick(&mut self, now: Instant) {
        if now > self.now {
            self.now = now;
        }
        for (t, timer) in self.timers.collect(self.now) {
            match timer {
                Timer::HoverClose(id) => {
                    let intent = self.nodes.get_mut(id).and_then(|n| n.binding.on_timer(t));
                    if let Some(intent) = intent {
                        debug!(?id, "hover close");
                        self.transition(id, intent);
                    }
                }
                Timer::Unmount(id) => {
                    let due = self
                        .nodes
                        .get(id)
                        .is_some_and(|n| n.pending_unmount == Some(t));
                    if due && self.unmount(id).is_err() {
                        warn!(?id, "deferred unmount of a missing overlay");
                    }
                }
            }
        }
    }

    /// Advance time by `d`.
    pub fn advance(&mut self, d: Duration) {
        self.tick(self.now + d);
    }

    /// Invoke a confirm or cancel action on an overlay's widget. A ready
    /// callback settles before this returns; a pending one settles through
    /// [`Stage::poll_actions`] or [`Stage::settle_next`]. Callback failures
    /// never surface here.
    pub fn invoke(&mut self, id: OverlayId, kind: ActionKind) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or_else(|| not_found(id))?;
        let name = node.widget.name();
        let actions = node
            .widget
            .actions_mut()
            .ok_or_else(|| Error::Invalid(format!("{name} has no actions")))?;
        match actions.invoke(kind) {
            Invocation::Busy => {}
            Invocation::Done(c) => self.settle(id, c),
            Invocation::Pending(fut) => {
                trace!(?id, ?kind, "action pending");
                self.actions.push(fut.map(move |c| (id, c)).boxed_local());
            }
        }
        Ok(())
    }

    /// Act on a settled action. The busy flag clears when the completion is
    /// dropped at the end of this function.
    fn settle(&mut self, id: OverlayId, c: Completion) {
        match &c.outcome {
            Settlement::Resolved => {
                debug!(?id, kind = ?c.kind, "action resolved");
                self.transition(id, Intent::Close);
            }
            Settlement::Rejected(e) => {
                warn!(?id, kind = ?c.kind, error = %e, "action failed");
                if let Some(node) = self.nodes.get_mut(id) {
                    node.widget.on_action_error(c.kind, e);
                }
            }
        }
    }

    /// Settle every action that is ready without blocking. Returns the number
    /// settled.
    pub fn poll_actions(&mut self) -> usize {
        let mut n = 0;
        while let Some(Some((id, c))) = self.actions.next().now_or_never() {
            self.settle(id, c);
            n += 1;
        }
        n
    }

    /// Wait for the next pending action and settle it. Returns false if none
    /// are in flight.
    pub async fn settle_next(&mut self) -> bool {
        match self.actions.next().await {
            Some((id, c)) => {
                self.settle(id, c);
                true
            }
            None => false,
        }
    }

    /// Number of actions in flight.
    pub fn pending_actions(&self) -> usize {
        self.actions.len()
    }

    /// Busy flags of an overlay's actions.
    pub fn action_state(&mut self, id: OverlayId) -> Result<ActionState> {
        let node = self.nodes.get_mut(id).ok_or_else(|| not_found(id))?;
        let name = node.widget.name();
        node.widget
            .as_mut()
            .action_state()
            .ok_or_else(|| Error::Invalid(format!("{name} has no actions")))
    }

    /// Render every mounted overlay, open or not, in mount-slot order.
    pub fn render(
        &self,
        resolver: &dyn StyleResolver,
        renderer: &mut dyn OverlayRenderer,
    ) -> Result<()> {
        for (id, node) in self.nodes.iter() {
            let state = node.machine.state();
            let mut props = node.widget.style_props();
            props.placement = Some(state.placement);
            let kind = node.widget.kind();

            let mut r = Render::new(resolver);
            node.widget.render(&mut r)?;
            renderer.draw(&OverlayFrame {
                id,
                kind,
                is_open: state.is_open,
                placement: state.placement,
                area: node.area(self.viewport),
                style: resolver.resolve(kind, &props),
                parts: r.into_parts(),
            })?;
        }
        Ok(())
    }
}

/// Error for an operation on an overlay that is not mounted.
fn not_found(id: OverlayId) -> Error {
    Error::NotFound(format!("overlay {id:?}"))
}
