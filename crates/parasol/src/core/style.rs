//! Presentation attributes handed to an external style resolver.
//!
//! The core never computes colors, sizes or layout styling. It describes what
//! it is drawing with [`StyleProps`] and asks a [`StyleResolver`] for an
//! opaque [`StyleDescriptor`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::overlay::placement::Placement;

/// The widget family being styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Plain popover content.
    Popper,
    /// Confirmation popover.
    PopConfirm,
    /// Modal dialog.
    Modal,
    /// A button inside an overlay.
    Button,
    /// A text run inside an overlay.
    Text,
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Popper => "popper",
            Self::PopConfirm => "popconfirm",
            Self::Modal => "modal",
            Self::Button => "button",
            Self::Text => "text",
        })
    }
}

/// Visual variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    /// Neutral.
    #[default]
    Default,
    /// Emphasized.
    Primary,
}

/// Size token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    /// Small.
    Small,
    /// Medium.
    #[default]
    Medium,
    /// Large.
    Large,
}

/// Inputs to the style resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleProps {
    /// Visual variant.
    pub variant: Variant,
    /// Size token.
    pub size: Size,
    /// Show a busy indicator.
    pub loading: bool,
    /// Placement of the overlay, if the element is one.
    pub placement: Option<Placement>,
    /// Stacking order managed by the caller.
    pub z_index: Option<i32>,
}

impl StyleProps {
    /// Props for an overlay with the given placement.
    pub fn overlay(placement: Placement) -> Self {
        Self {
            placement: Some(placement),
            ..Default::default()
        }
    }

    /// Set the variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Set the loading flag.
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Set the stacking order.
    pub fn with_z_index(mut self, z: i32) -> Self {
        self.z_index = Some(z);
        self
    }
}

/// Opaque output of a style resolver: an ordered list of style layers the
/// renderer applies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleDescriptor {
    /// Style layer names, outermost first.
    pub layers: Vec<String>,
}

impl StyleDescriptor {
    /// Append a layer.
    pub fn push_layer(&mut self, name: impl Into<String>) {
        self.layers.push(name.into());
    }

    /// Does the descriptor contain a layer?
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l == name)
    }
}

/// Maps widget kinds and props to presentation. Implementations must be pure.
pub trait StyleResolver {
    /// Resolve the style for one element.
    fn resolve(&self, kind: WidgetKind, props: &StyleProps) -> StyleDescriptor;
}

/// A resolver that names layers after its inputs and nothing more.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unstyled;

impl StyleResolver for Unstyled {
    fn resolve(&self, kind: WidgetKind, props: &StyleProps) -> StyleDescriptor {
        let mut d = StyleDescriptor::default();
        d.push_layer(kind.to_string());
        if props.variant == Variant::Primary {
            d.push_layer("primary");
        }
        d.push_layer(match props.size {
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
        });
        if let Some(p) = props.placement {
            d.push_layer(format!("placement-{p}"));
        }
        if props.loading {
            d.push_layer("loading");
        }
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstyled_layers() {
        let d = Unstyled.resolve(
            WidgetKind::Button,
            &StyleProps::default()
                .with_variant(Variant::Primary)
                .with_size(Size::Small)
                .with_loading(true),
        );
        assert_eq!(d.layers, vec!["button", "primary", "small", "loading"]);

        let d = Unstyled.resolve(WidgetKind::Popper, &StyleProps::overlay(Placement::BottomEnd));
        assert!(d.has_layer("placement-bottom-end"));
    }

    #[test]
    fn resolution_is_pure() {
        let props = StyleProps::overlay(Placement::Left).with_z_index(3);
        assert_eq!(
            Unstyled.resolve(WidgetKind::Modal, &props),
            Unstyled.resolve(WidgetKind::Modal, &props)
        );
    }
}
