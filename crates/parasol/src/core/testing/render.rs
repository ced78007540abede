use std::{cell::RefCell, rc::Rc};

use crate::{
    OverlayId,
    error::Result,
    render::{OverlayFrame, OverlayRenderer},
};

/// A renderer that keeps the frames of the last render pass.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Frames drawn since the last [`RecordingRenderer::clear`].
    pub frames: Vec<OverlayFrame>,
}

impl RecordingRenderer {
    /// Construct an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget recorded frames.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// The most recent frame for an overlay.
    pub fn frame(&self, id: OverlayId) -> Option<&OverlayFrame> {
        self.frames.iter().rev().find(|f| f.id == id)
    }
}

impl OverlayRenderer for RecordingRenderer {
    fn draw(&mut self, frame: &OverlayFrame) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Records every value passed to an `on_open_change` callback.
#[derive(Debug, Default, Clone)]
pub struct OpenLog {
    /// Recorded values, oldest first.
    calls: Rc<RefCell<Vec<bool>>>,
}

impl OpenLog {
    /// Construct an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that appends to this log.
    pub fn callback(&self) -> impl FnMut(bool) + 'static {
        let calls = self.calls.clone();
        move |v| calls.borrow_mut().push(v)
    }

    /// All recorded values.
    pub fn calls(&self) -> Vec<bool> {
        self.calls.borrow().clone()
    }

    /// Number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Were no calls recorded?
    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }
}
