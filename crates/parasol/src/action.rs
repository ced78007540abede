//! Confirm/cancel actions with per-action busy flags.
//!
//! An invocation marks its kind busy, runs the callback and yields a
//! [`Completion`] once the callback has settled. The completion owns the busy
//! guard: the flag clears when the completion is dropped, which the stage does
//! after it has acted on the outcome. Dropping an in-flight invocation clears
//! the flag too.

use std::{cell::Cell, future::Future, rc::Rc};

use futures::{FutureExt, future::LocalBoxFuture};
use scopeguard::ScopeGuard;
use tracing::debug;

use crate::error::{Error, Result};

/// The two actions a confirmation widget exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Accept.
    Confirm,
    /// Decline.
    Cancel,
}

/// Busy flags, one per action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionState {
    /// A confirm action is in flight.
    pub is_confirm_busy: bool,
    /// A cancel action is in flight.
    pub is_cancel_busy: bool,
}

impl ActionState {
    /// Busy flag for one kind.
    pub fn is_busy(&self, kind: ActionKind) -> bool {
        match kind {
            ActionKind::Confirm => self.is_confirm_busy,
            ActionKind::Cancel => self.is_cancel_busy,
        }
    }
}

/// What a callback hands back: an immediate outcome or one still pending.
pub enum ActionResult {
    /// Already settled.
    Ready(Result<()>),
    /// Settles when the future completes.
    Pending(LocalBoxFuture<'static, Result<()>>),
}

impl ActionResult {
    /// Immediate success.
    pub fn ok() -> Self {
        Self::Ready(Ok(()))
    }

    /// Immediate failure.
    pub fn fail(msg: impl ToString) -> Self {
        Self::Ready(Err(Error::action(msg)))
    }

    /// Wrap a future.
    pub fn pending<F>(fut: F) -> Self
    where
        F: Future<Output = Result<()>> + 'static,
    {
        Self::Pending(fut.boxed_local())
    }
}

impl From<()> for ActionResult {
    fn from(_: ()) -> Self {
        Self::ok()
    }
}

impl From<Result<()>> for ActionResult {
    fn from(r: Result<()>) -> Self {
        Self::Ready(r)
    }
}

/// A confirm or cancel callback.
pub type ActionFn = Box<dyn FnMut() -> ActionResult>;

/// How an action settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The callback succeeded.
    Resolved,
    /// The callback failed.
    Rejected(Error),
}

impl From<Result<()>> for Settlement {
    fn from(r: Result<()>) -> Self {
        match r {
            Ok(()) => Self::Resolved,
            Err(e) => Self::Rejected(e),
        }
    }
}

/// Clears a busy flag when dropped.
pub type BusyGuard = ScopeGuard<Rc<Cell<bool>>, fn(Rc<Cell<bool>>)>;

/// Guard callback.
fn release(flag: Rc<Cell<bool>>) {
    flag.set(false);
}

/// A settled action. The kind stays busy until this is dropped.
pub struct Completion {
    /// The action that ran.
    pub kind: ActionKind,
    /// Its outcome.
    pub outcome: Settlement,
    /// Busy flag reset.
    _busy: BusyGuard,
}

/// The immediate result of [`Actions::invoke`].
pub enum Invocation {
    /// The kind was already busy; the call was absorbed.
    Busy,
    /// The callback settled synchronously.
    Done(Completion),
    /// The callback is still running.
    Pending(LocalBoxFuture<'static, Completion>),
}

/// Busy bookkeeping for one widget's actions.
#[derive(Debug, Default, Clone)]
pub struct ActionCoordinator {
    /// Confirm busy flag.
    confirm: Rc<Cell<bool>>,
    /// Cancel busy flag.
    cancel: Rc<Cell<bool>>,
}

impl ActionCoordinator {
    /// Flag for one kind.
    fn flag(&self, kind: ActionKind) -> &Rc<Cell<bool>> {
        match kind {
            ActionKind::Confirm => &self.confirm,
            ActionKind::Cancel => &self.cancel,
        }
    }

    /// Snapshot of both flags.
    pub fn state(&self) -> ActionState {
        ActionState {
            is_confirm_busy: self.confirm.get(),
            is_cancel_busy: self.cancel.get(),
        }
    }

    /// Run `callback` as action `kind`. A missing callback succeeds at once.
    pub fn invoke(&self, kind: ActionKind, callback: Option<&mut ActionFn>) -> Invocation {
        let flag = self.flag(kind);
        if flag.get() {
            debug!(?kind, "action already busy");
            return Invocation::Busy;
        }
        flag.set(true);
        let busy: BusyGuard = scopeguard::guard(flag.clone(), release as fn(Rc<Cell<bool>>));
        let result = callback.map_or_else(ActionResult::ok, |cb| cb());
        match result {
            ActionResult::Ready(r) => Invocation::Done(Completion {
                kind,
                outcome: r.into(),
                _busy: busy,
            }),
            ActionResult::Pending(fut) => Invocation::Pending(
                async move {
                    let r = fut.await;
                    Completion {
                        kind,
                        outcome: r.into(),
                        _busy: busy,
                    }
                }
                .boxed_local(),
            ),
        }
    }
}

/// Confirm and cancel callbacks plus their coordinator.
#[derive(Default)]
pub struct Actions {
    /// Busy flags.
    coordinator: ActionCoordinator,
    /// Confirm callback.
    on_confirm: Option<ActionFn>,
    /// Cancel callback.
    on_cancel: Option<ActionFn>,
}

impl Actions {
    /// Actions with no callbacks; both succeed immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confirm callback.
    pub fn with_on_confirm<R, F>(mut self, mut f: F) -> Self
    where
        F: FnMut() -> R + 'static,
        R: Into<ActionResult>,
    {
        self.on_confirm = Some(Box::new(move || f().into()));
        self
    }

    /// Set the cancel callback.
    pub fn with_on_cancel<R, F>(mut self, mut f: F) -> Self
    where
        F: FnMut() -> R + 'static,
        R: Into<ActionResult>,
    {
        self.on_cancel = Some(Box::new(move || f().into()));
        self
    }

    /// Busy flags.
    pub fn state(&self) -> ActionState {
        self.coordinator.state()
    }

    /// Invoke one action.
    pub fn invoke(&mut self, kind: ActionKind) -> Invocation {
        let callback = match kind {
            ActionKind::Confirm => self.on_confirm.as_mut(),
            ActionKind::Cancel => self.on_cancel.as_mut(),
        };
        self.coordinator.invoke(kind, callback)
    }
}

#[cfg(test)]
mod tests {
    use futures::{channel::oneshot, executor::block_on};

    use super::*;

    #[test]
    fn ready_success_and_failure() {
        let mut a = Actions::new()
            .with_on_confirm(|| ())
            .with_on_cancel(|| ActionResult::fail("nope"));

        let Invocation::Done(c) = a.invoke(ActionKind::Confirm) else {
            panic!("expected a ready completion");
        };
        assert_eq!(c.outcome, Settlement::Resolved);
        assert!(a.state().is_confirm_busy);
        drop(c);
        assert!(!a.state().is_confirm_busy);

        let Invocation::Done(c) = a.invoke(ActionKind::Cancel) else {
            panic!("expected a ready completion");
        };
        assert_eq!(c.outcome, Settlement::Rejected(Error::action("nope")));
        drop(c);
        assert_eq!(a.state(), ActionState::default());
    }

    #[test]
    fn missing_callback_succeeds() {
        let mut a = Actions::new();
        assert!(matches!(
            a.invoke(ActionKind::Cancel),
            Invocation::Done(Completion {
                outcome: Settlement::Resolved,
                ..
            })
        ));
    }

    #[test]
    fn pending_is_busy_until_settled() {
        let (tx, rx) = oneshot::channel::<Result<()>>();
        let mut rx = Some(rx);
        let mut a = Actions::new().with_on_confirm(move || {
            let rx = rx.take();
            ActionResult::pending(async move {
                match rx {
                    Some(rx) => rx.await.unwrap_or_else(|_| Err(Error::action("dropped"))),
                    None => Ok(()),
                }
            })
        });

        let Invocation::Pending(fut) = a.invoke(ActionKind::Confirm) else {
            panic!("expected a pending invocation");
        };
        assert!(a.state().is_confirm_busy);
        assert!(!a.state().is_cancel_busy);
        assert!(matches!(a.invoke(ActionKind::Confirm), Invocation::Busy));

        tx.send(Err(Error::action("boom"))).unwrap();
        let c = block_on(fut);
        assert_eq!(c.kind, ActionKind::Confirm);
        assert!(matches!(c.outcome, Settlement::Rejected(_)));
        drop(c);
        assert!(!a.state().is_confirm_busy);
    }

    #[test]
    fn dropping_pending_clears_busy() {
        let mut a = Actions::new().with_on_cancel(|| ActionResult::pending(futures::future::pending()));
        let inv = a.invoke(ActionKind::Cancel);
        assert!(a.state().is_cancel_busy);
        drop(inv);
        assert!(!a.state().is_cancel_busy);
    }
}
