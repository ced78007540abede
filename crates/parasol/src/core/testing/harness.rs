use std::time::Duration;

use super::render::{OpenLog, RecordingRenderer};
use crate::{
    OverlayId, OverlaySpec, Stage,
    error::Result,
    event::{key::Key, mouse::MouseEvent},
    geom::Point,
    listeners::Target,
    render::OverlayFrame,
    settings::Settings,
    style::Unstyled,
    widget::Widget,
};

/// A harness that holds a [`Stage`] and a [`RecordingRenderer`]. Tests drive
/// the stage with pointer, key and clock helpers, then inspect overlay state,
/// listener counts and rendered frames.
pub struct Harness {
    /// The stage under test.
    pub stage: Stage,
    /// Frames from the last [`Harness::render`].
    pub renderer: RecordingRenderer,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// A harness over a stage with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// A harness over a stage with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            stage: Stage::with_settings(settings),
            renderer: RecordingRenderer::new(),
        }
    }

    /// Mount an overlay and record its visibility changes.
    pub fn mount(
        &mut self,
        widget: impl Into<Box<dyn Widget>>,
        spec: OverlaySpec,
    ) -> (OverlayId, OpenLog) {
        let log = OpenLog::new();
        let id = self
            .stage
            .mount(widget, spec.with_on_open_change(log.callback()));
        (id, log)
    }

    /// Press the pointer at a location.
    pub fn click(&mut self, p: impl Into<Point>) {
        self.stage.mouse(MouseEvent::down(p));
    }

    /// Move the pointer to a location.
    pub fn move_to(&mut self, p: impl Into<Point>) {
        self.stage.mouse(MouseEvent::moved(p));
    }

    /// Press a key.
    pub fn key(&mut self, k: impl Into<Key>) {
        self.stage.key(k);
    }

    /// Advance the stage clock by `ms` milliseconds, firing due timers.
    pub fn advance(&mut self, ms: u64) {
        self.stage.advance(Duration::from_millis(ms));
    }

    /// Is the overlay open?
    pub fn is_open(&self, id: OverlayId) -> bool {
        self.stage.is_open(id)
    }

    /// Number of document listeners.
    pub fn document_listeners(&self) -> usize {
        self.stage.listener_count(Target::Document)
    }

    /// Render every overlay with the unstyled resolver, replacing recorded
    /// frames.
    pub fn render(&mut self) -> Result<()> {
        self.renderer.clear();
        self.stage.render(&Unstyled, &mut self.renderer)
    }

    /// Render and return the frame for one overlay.
    pub fn frame(&mut self, id: OverlayId) -> Result<Option<OverlayFrame>> {
        self.render()?;
        Ok(self.renderer.frame(id).cloned())
    }
}
