//! Modal dialogs opened imperatively through a handle.

use std::{fmt, rc::Rc, time::Duration};

use tracing::debug;

use super::popper::text_extent;
use crate::{
    InstanceId, OverlayId,
    core::stage::{OverlaySpec, Stage},
    error::Result,
    geom::Expanse,
    instance::{Change, Handle, Mergeable, Phase, Registry, SharedRegistry},
    overlay::dismiss::DismissConfig,
    render::Render,
    settings::Settings,
    style::{Size, StyleProps, WidgetKind},
    widget::Widget,
};

/// Close callback.
pub type CloseFn = Rc<dyn Fn()>;

/// Props of a modal.
#[derive(Clone)]
pub struct ModalProps {
    /// Heading.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Size token.
    pub size: Size,
    /// Close on Escape.
    pub should_close_when_press_esc: bool,
    /// Close on a press outside the dialog.
    pub should_close_when_click_backdrop: bool,
    /// Stacking order, passed through to the style resolver.
    pub z_index: Option<i32>,
    /// Called once when the modal closes, however it closes.
    pub on_close: Option<CloseFn>,
}

impl Default for ModalProps {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            size: Size::Medium,
            should_close_when_press_esc: true,
            should_close_when_click_backdrop: true,
            z_index: None,
            on_close: None,
        }
    }
}

impl fmt::Debug for ModalProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalProps")
            .field("title", &self.title)
            .field("content", &self.content)
            .field("size", &self.size)
            .field("should_close_when_press_esc", &self.should_close_when_press_esc)
            .field(
                "should_close_when_click_backdrop",
                &self.should_close_when_click_backdrop,
            )
            .field("z_index", &self.z_index)
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

impl ModalProps {
    /// Props with a title and body.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Set the close callback.
    pub fn with_on_close(mut self, f: impl Fn() + 'static) -> Self {
        self.on_close = Some(Rc::new(f));
        self
    }

    /// Dismissal gates derived from the props.
    pub fn dismiss(&self) -> DismissConfig {
        DismissConfig {
            close_on_backdrop: self.should_close_when_click_backdrop,
            close_on_esc: self.should_close_when_press_esc,
        }
    }
}

/// A partial update of [`ModalProps`]. Unset fields are left alone.
#[derive(Default)]
pub struct ModalPatch {
    /// New heading.
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// New size.
    pub size: Option<Size>,
    /// New Escape gate.
    pub should_close_when_press_esc: Option<bool>,
    /// New backdrop gate.
    pub should_close_when_click_backdrop: Option<bool>,
    /// New stacking order.
    pub z_index: Option<i32>,
    /// New close callback.
    pub on_close: Option<CloseFn>,
}

impl ModalPatch {
    /// Patch the heading.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Patch the body.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

impl Mergeable for ModalProps {
    type Patch = ModalPatch;

    fn merge(&mut self, patch: ModalPatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.content {
            self.content = v;
        }
        if let Some(v) = patch.size {
            self.size = v;
        }
        if let Some(v) = patch.should_close_when_press_esc {
            self.should_close_when_press_esc = v;
        }
        if let Some(v) = patch.should_close_when_click_backdrop {
            self.should_close_when_click_backdrop = v;
        }
        if patch.z_index.is_some() {
            self.z_index = patch.z_index;
        }
        if patch.on_close.is_some() {
            self.on_close = patch.on_close;
        }
    }
}

/// A modal dialog: a title over a body, centered in the viewport.
#[derive(Debug)]
pub struct Modal {
    /// Current props.
    props: ModalProps,
}

impl Modal {
    /// Construct a modal.
    pub fn new(props: ModalProps) -> Self {
        Self { props }
    }

    /// Current props.
    pub fn props(&self) -> &ModalProps {
        &self.props
    }

    /// Replace the props in place.
    pub fn set_props(&mut self, props: ModalProps) {
        self.props = props;
    }
}

impl Widget for Modal {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Modal
    }

    fn content_size(&self) -> Expanse {
        let title = text_extent(&self.props.title);
        let body = text_extent(&self.props.content);
        Expanse::new(title.w.max(body.w), title.h.saturating_add(body.h))
    }

    fn style_props(&self) -> StyleProps {
        StyleProps {
            size: self.props.size,
            z_index: self.props.z_index,
            ..Default::default()
        }
    }

    fn render(&self, r: &mut Render) -> Result<()> {
        r.text(self.props.title.clone(), &StyleProps::default());
        r.text(
            self.props.content.clone(),
            &StyleProps::default().with_size(self.props.size),
        );
        Ok(())
    }
}

/// The rendering-layer side of imperatively opened modals.
///
/// [`StaticModals::open`] registers props and returns a handle. Nothing is
/// mounted until [`StaticModals::sync`] reconciles the registry into the
/// stage, which the host calls once per loop turn alongside its event
/// dispatch.
pub struct StaticModals {
    /// Instance slots.
    registry: SharedRegistry<ModalProps>,
    /// Time between close and unmount.
    exit_delay: Duration,
}

impl Default for StaticModals {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl StaticModals {
    /// A manager with the given exit transition length.
    pub fn new(exit_delay: Duration) -> Self {
        Self {
            registry: Registry::shared(),
            exit_delay,
        }
    }

    /// A manager configured from stage settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.exit_delay())
    }

    /// Open a modal.
    pub fn open(&self, props: ModalProps) -> Handle<ModalProps> {
        Handle::open(&self.registry, props)
    }

    /// Number of live instance slots, including ones still closing.
    pub fn live(&self) -> usize {
        self.registry.borrow().len()
    }

    /// The shared registry.
    pub fn registry(&self) -> &SharedRegistry<ModalProps> {
        &self.registry
    }

    /// Reconcile the registry into `stage`: mount new instances, push updates
    /// into mounted widgets, close and schedule unmount for closing ones,
    /// turn stage-side dismissals into closes and release slots whose overlay
    /// is gone. Close callbacks run after all registry borrows are released.
    pub fn sync(&self, stage: &mut Stage) -> Result<()> {
        self.detect_dismissed(stage);
        let changes = self.registry.borrow_mut().drain_changes();
        let mut closed = vec![];
        for change in changes {
            match change {
                Change::Mounted(id) => self.mount(stage, id),
                Change::Updated(id) => self.update(stage, id)?,
                Change::Closing(id) => {
                    if let Some(f) = self.close(stage, id)? {
                        closed.push(f);
                    }
                }
            }
        }
        self.release(stage);
        for f in closed {
            f();
        }
        Ok(())
    }

    /// Props and overlay of a slot, cloned out of the registry.
    fn snapshot(&self, id: InstanceId) -> Option<(ModalProps, Option<OverlayId>)> {
        let reg = self.registry.borrow();
        reg.props(id).map(|p| (p.clone(), reg.overlay(id)))
    }

    /// Mount an overlay for a new slot.
    fn mount(&self, stage: &mut Stage, id: InstanceId) {
        let Some((props, None)) = self.snapshot(id) else {
            return;
        };
        if self.registry.borrow().phase(id) != Some(Phase::Open) {
            // Closed before it was ever shown; the queued close releases it.
            return;
        }
        let spec = OverlaySpec::centered()
            .with_dismiss(props.dismiss())
            .with_open(true);
        let overlay = stage.mount(Modal::new(props), spec);
        self.registry.borrow_mut().bind(id, overlay);
        debug!(?id, ?overlay, "static modal mounted");
    }

    /// Push merged props into a mounted modal without remounting it.
    fn update(&self, stage: &mut Stage, id: InstanceId) -> Result<()> {
        let Some((props, Some(overlay))) = self.snapshot(id) else {
            return Ok(());
        };
        if !stage.contains(overlay) {
            return Ok(());
        }
        stage.set_dismiss(overlay, props.dismiss())?;
        stage.with_widget::<Modal, _>(overlay, |m| m.set_props(props))
    }

    /// Close a slot's overlay and schedule its unmount. Returns the close
    /// callback to run.
    fn close(&self, stage: &mut Stage, id: InstanceId) -> Result<Option<CloseFn>> {
        let Some((props, overlay)) = self.snapshot(id) else {
            return Ok(None);
        };
        match overlay.filter(|o| stage.contains(*o)) {
            Some(overlay) => {
                stage.close(overlay)?;
                if self.exit_delay.is_zero() {
                    stage.unmount(overlay)?;
                } else {
                    stage.unmount_after(overlay, self.exit_delay)?;
                }
            }
            None => {
                self.registry.borrow_mut().unregister(id);
            }
        }
        Ok(props.on_close)
    }

    /// Mark open slots whose overlay was closed or removed on the stage side
    /// as closing.
    fn detect_dismissed(&self, stage: &Stage) {
        let mut reg = self.registry.borrow_mut();
        for id in reg.in_phase(Phase::Open) {
            let dismissed = reg.overlay(id).is_some_and(|o| !stage.is_open(o));
            if dismissed {
                debug!(?id, "static modal dismissed");
                reg.request_close(id);
            }
        }
    }

    /// Release closing slots whose overlay has been unmounted.
    fn release(&self, stage: &Stage) {
        let mut reg = self.registry.borrow_mut();
        for id in reg.in_phase(Phase::Closing) {
            if reg.overlay(id).is_some_and(|o| !stage.contains(o)) {
                reg.unregister(id);
            }
        }
    }
}
