//! The trait implemented by overlay content.

use std::any::{Any, type_name};

use crate::{
    action::{ActionKind, ActionState, Actions},
    error::{Error, Result},
    geom::Expanse,
    render::Render,
    style::{StyleProps, WidgetKind},
};

/// Widgets are the content of a mounted overlay. The stage owns visibility;
/// a widget only describes what it draws and, optionally, which actions it
/// exposes.
pub trait Widget: Any {
    /// The widget family, passed to the style resolver.
    fn kind(&self) -> WidgetKind;

    /// Size of the content box.
    fn content_size(&self) -> Expanse;

    /// Style props for the overlay container. The stage fills in placement.
    fn style_props(&self) -> StyleProps {
        StyleProps::default()
    }

    /// Render this widget's parts.
    fn render(&self, _r: &mut Render) -> Result<()> {
        Ok(())
    }

    /// Confirm/cancel actions, for widgets that have them.
    fn actions_mut(&mut self) -> Option<&mut Actions> {
        None
    }

    /// Called when an action callback fails. The overlay stays open.
    fn on_action_error(&mut self, _kind: ActionKind, _err: &Error) {}

    /// Called exactly once, immediately before the overlay is removed.
    fn on_unmount(&mut self) {}

    /// Name used in logs.
    fn name(&self) -> String {
        let name = type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name).to_lowercase()
    }
}

impl dyn Widget {
    /// Busy flags of this widget's actions, if it has any.
    pub fn action_state(&mut self) -> Option<ActionState> {
        self.actions_mut().map(|a| a.state())
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}
