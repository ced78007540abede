//! A renderer that writes frames to the log.

use parasol::{
    error::Result,
    render::{OverlayFrame, OverlayRenderer, Part},
};
use tracing::info;

/// Logs one line per overlay and one per part.
#[derive(Debug, Default)]
pub struct LogRenderer {
    /// Frames drawn so far.
    drawn: usize,
}

impl LogRenderer {
    /// Number of frames drawn.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl OverlayRenderer for LogRenderer {
    fn draw(&mut self, f: &OverlayFrame) -> Result<()> {
        self.drawn += 1;
        info!(
            id = ?f.id,
            kind = %f.kind,
            open = f.is_open,
            placement = %f.placement,
            area = ?f.area,
            style = %f.style.layers.join(" "),
            "overlay"
        );
        if !f.is_open {
            return Ok(());
        }
        for p in &f.parts {
            match p {
                Part::Text { text, .. } => info!("  | {text}"),
                Part::Button { label, loading, .. } => {
                    let spinner = if *loading { " ..." } else { "" };
                    info!("  [{label}{spinner}]");
                }
            }
        }
        Ok(())
    }
}
