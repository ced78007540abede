//! PopConfirm widget: a popover asking the user to confirm or cancel.

use super::popper::{cells, text_extent};
use crate::{
    action::{ActionKind, ActionResult, Actions},
    error::{Error, Result},
    geom::Expanse,
    render::Render,
    style::{Size, StyleProps, Variant, WidgetKind},
    widget::Widget,
};

/// Failure hook.
pub type ErrorFn = Box<dyn FnMut(ActionKind, &Error)>;

/// A confirmation popover with a title and cancel/confirm buttons.
///
/// Each button is wired to its own action. While an action is in flight the
/// matching button renders with `loading` set and further presses of it are
/// absorbed. A successful action closes the popover; a failed one leaves it
/// open and is reported to the `on_error` hook.
pub struct PopConfirm {
    /// Prompt text.
    title: String,
    /// Cancel button label.
    cancel_text: String,
    /// Confirm button label.
    ok_text: String,
    /// Callbacks and busy flags.
    actions: Actions,
    /// Failure hook.
    on_error: Option<ErrorFn>,
}

impl PopConfirm {
    /// Construct a popconfirm with default labels.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            cancel_text: "Cancel".into(),
            ok_text: "OK".into(),
            actions: Actions::new(),
            on_error: None,
        }
    }

    /// Set the confirm callback.
    pub fn with_on_confirm<R, F>(mut self, f: F) -> Self
    where
        F: FnMut() -> R + 'static,
        R: Into<ActionResult>,
    {
        self.actions = self.actions.with_on_confirm(f);
        self
    }

    /// Set the cancel callback.
    pub fn with_on_cancel<R, F>(mut self, f: F) -> Self
    where
        F: FnMut() -> R + 'static,
        R: Into<ActionResult>,
    {
        self.actions = self.actions.with_on_cancel(f);
        self
    }

    /// Set the failure hook.
    pub fn with_on_error(mut self, f: impl FnMut(ActionKind, &Error) + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Override the button labels.
    pub fn with_labels(mut self, cancel: impl Into<String>, ok: impl Into<String>) -> Self {
        self.cancel_text = cancel.into();
        self.ok_text = ok.into();
        self
    }

    /// The prompt text.
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Widget for PopConfirm {
    fn kind(&self) -> WidgetKind {
        WidgetKind::PopConfirm
    }

    fn content_size(&self) -> Expanse {
        let title = text_extent(&self.title);
        // Bracketed labels separated by a space.
        let buttons = cells(
            self.cancel_text
                .chars()
                .count()
                .saturating_add(self.ok_text.chars().count())
                .saturating_add(5),
        );
        Expanse::new(title.w.max(buttons), title.h.saturating_add(1))
    }

    fn render(&self, r: &mut Render) -> Result<()> {
        let state = self.actions.state();
        r.text(self.title.clone(), &StyleProps::default());
        r.button(
            self.cancel_text.clone(),
            Some(ActionKind::Cancel),
            &StyleProps::default()
                .with_size(Size::Small)
                .with_loading(state.is_cancel_busy),
        );
        r.button(
            self.ok_text.clone(),
            Some(ActionKind::Confirm),
            &StyleProps::default()
                .with_variant(Variant::Primary)
                .with_size(Size::Small)
                .with_loading(state.is_confirm_busy),
        );
        Ok(())
    }

    fn actions_mut(&mut self) -> Option<&mut Actions> {
        Some(&mut self.actions)
    }

    fn on_action_error(&mut self, kind: ActionKind, err: &Error) {
        if let Some(f) = self.on_error.as_mut() {
            f(kind, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render::Part, style::Unstyled};

    #[test]
    fn default_labels_and_layout() {
        let p = PopConfirm::new("Delete?");
        assert_eq!(p.content_size(), Expanse::new(13, 2));

        let mut r = Render::new(&Unstyled);
        p.render(&mut r).unwrap();
        let labels: Vec<_> = r.into_parts().iter().map(|p| p.text().to_owned()).collect();
        assert_eq!(labels, vec!["Delete?", "Cancel", "OK"]);
    }

    #[test]
    fn confirm_button_is_primary() {
        let p = PopConfirm::new("Sure?").with_labels("No", "Yes");
        let mut r = Render::new(&Unstyled);
        p.render(&mut r).unwrap();
        let parts = r.into_parts();
        let Part::Button { label, style, loading, .. } = &parts[2] else {
            panic!("expected a button");
        };
        assert_eq!(label, "Yes");
        assert!(style.has_layer("primary"));
        assert!(!loading);
    }
}
