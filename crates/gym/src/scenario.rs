//! Scripted overlay scenarios, run against the wall clock.

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::ValueEnum;
use parasol::{
    OverlaySpec, Stage,
    action::{ActionKind, ActionResult},
    error::Error,
    event::{key::KeyCode, mouse::MouseEvent},
    geom::{Point, Rect},
    overlay::{placement::Placement, trigger::Trigger},
    settings::Settings,
    style::Unstyled,
    widgets::{ModalPatch, ModalProps, PopConfirm, Popper, StaticModals},
};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::log::LogRenderer;

/// Available scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Click to open, press outside to close.
    Click,
    /// Hover open with a delayed close.
    Hover,
    /// Asynchronous confirm and a failing cancel.
    Popconfirm,
    /// A statically opened modal, updated then dismissed with Escape.
    Modal,
}

/// A stage driven by scripted input.
pub struct Gym {
    /// The stage.
    stage: Stage,
    /// Frame sink.
    renderer: LogRenderer,
}

impl Gym {
    /// A gym over a fresh stage.
    pub fn new(settings: Settings) -> Self {
        Self {
            stage: Stage::with_settings(settings),
            renderer: LogRenderer::default(),
        }
    }

    /// Run one scenario to completion.
    pub async fn run(&mut self, s: Scenario) -> Result<()> {
        info!(scenario = ?s, "start");
        match s {
            Scenario::Click => self.click_scenario()?,
            Scenario::Hover => self.hover_scenario().await?,
            Scenario::Popconfirm => self.popconfirm_scenario().await?,
            Scenario::Modal => self.modal_scenario().await?,
        }
        info!(scenario = ?s, frames = self.renderer.drawn(), "done");
        Ok(())
    }

    /// Log every mounted overlay.
    fn frame(&mut self, label: &str) -> Result<()> {
        info!("--- {label}");
        self.stage.render(&Unstyled, &mut self.renderer)?;
        Ok(())
    }

    /// Bring stage time up to the wall clock.
    fn catch_up(&mut self) {
        self.stage.tick(Instant::now());
    }

    /// Press at a location.
    fn press(&mut self, x: u32, y: u32) {
        self.catch_up();
        self.stage.mouse(MouseEvent::down(Point::new(x, y)));
    }

    /// Move the pointer.
    fn point(&mut self, x: u32, y: u32) {
        self.catch_up();
        self.stage.mouse(MouseEvent::moved(Point::new(x, y)));
    }

    /// Sleep until no timers remain, firing each as it falls due.
    async fn idle(&mut self) {
        while let Some(wait) = self.stage.current_wait() {
            sleep(wait).await;
            self.catch_up();
        }
    }

    /// Settle every pending action.
    async fn settle(&mut self) {
        while self.stage.settle_next().await {}
    }

    /// Click trigger with outside dismissal.
    fn click_scenario(&mut self) -> Result<()> {
        let id = self.stage.mount(
            Popper::new("Saved to disk"),
            OverlaySpec::anchored(Rect::new(10, 10, 6, 1))
                .with_placement(Placement::BottomStart)
                .with_on_open_change(|open| info!(open, "click popper")),
        );
        self.frame("mounted")?;
        self.press(12, 10);
        self.frame("after pressing the reference")?;
        self.press(60, 2);
        self.frame("after pressing outside")?;
        self.stage.unmount(id)?;
        Ok(())
    }

    /// Hover trigger: leave, re-enter, then leave for good.
    async fn hover_scenario(&mut self) -> Result<()> {
        let id = self.stage.mount(
            Popper::new("Tooltip text"),
            OverlaySpec::anchored(Rect::new(30, 12, 8, 1))
                .with_trigger(Trigger::Hover)
                .with_on_open_change(|open| info!(open, "hover popper")),
        );
        self.point(31, 12);
        self.frame("pointer on the reference")?;
        self.point(0, 0);
        sleep(self.stage.settings().hover_leave_delay() / 2).await;
        self.catch_up();
        self.point(32, 12);
        self.frame("re-entered before the delay")?;
        self.point(0, 0);
        self.idle().await;
        self.frame("left for good")?;
        self.stage.unmount(id)?;
        Ok(())
    }

    /// One confirm that resolves later, one cancel that fails.
    async fn popconfirm_scenario(&mut self) -> Result<()> {
        let reference = Rect::new(20, 12, 8, 1);
        let id = self.stage.mount(
            PopConfirm::new("Delete this file?")
                .with_on_confirm(|| {
                    ActionResult::pending(async {
                        sleep(Duration::from_millis(300)).await;
                        Ok(())
                    })
                })
                .with_on_cancel(|| {
                    ActionResult::pending(async {
                        sleep(Duration::from_millis(200)).await;
                        Err(Error::action("network unreachable"))
                    })
                })
                .with_on_error(|kind, e| warn!(?kind, %e, "popconfirm action failed")),
            OverlaySpec::anchored(reference).with_on_open_change(|open| info!(open, "popconfirm")),
        );

        self.press(21, 12);
        self.stage.invoke(id, ActionKind::Cancel)?;
        self.frame("cancel in flight")?;
        self.settle().await;
        self.frame("cancel failed, still open")?;

        self.stage.invoke(id, ActionKind::Confirm)?;
        self.stage.invoke(id, ActionKind::Confirm)?;
        self.frame("confirm in flight, second press absorbed")?;
        self.settle().await;
        self.frame("confirm resolved")?;
        self.stage.unmount(id)?;
        Ok(())
    }

    /// A static modal: open, update in place, dismiss, exit.
    async fn modal_scenario(&mut self) -> Result<()> {
        let modals = StaticModals::from_settings(self.stage.settings());
        let handle = modals.open(
            ModalProps::new("Welcome", "Press Esc to close.")
                .with_on_close(|| info!("modal closed")),
        );
        modals.sync(&mut self.stage)?;
        self.frame("modal opened")?;

        handle.update(ModalPatch::content("Body replaced in place."));
        modals.sync(&mut self.stage)?;
        self.frame("modal updated")?;

        self.catch_up();
        self.stage.key(KeyCode::Esc);
        modals.sync(&mut self.stage)?;
        self.frame("modal dismissed, exiting")?;

        self.idle().await;
        modals.sync(&mut self.stage)?;
        info!(live = modals.live(), mounted = self.stage.len(), "modal released");
        Ok(())
    }
}
