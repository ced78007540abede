//! Parasol: the overlay lifecycle core of a themeable widget library.
//!
//! Parasol owns the hard part of popovers, confirmation popovers and modals:
//! when they are open, which listeners they hold, how outside interaction
//! dismisses them and how asynchronous confirm/cancel actions settle. Drawing
//! and theming are left to an external renderer and style resolver.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Stage`] - Hosts mounted overlays and dispatches events, time and
//!   renders
//! - [`Widget`] - The trait implemented by overlay content
//! - [`widgets::StaticModals`] - Imperative open/update/close for modals
//!
//! # Module Organization
//!
//! - [`overlay`] - State machine, trigger binding, dismissal and placement
//! - [`action`] - Confirm/cancel actions with busy flags
//! - [`instance`] - Registry behind imperative handles
//! - [`widgets`] - Built-in widget implementations

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

// Public modules
pub mod action;
pub mod instance;
pub mod overlay;
pub mod widget;
pub mod widgets;

/// Geometry primitives.
pub use parasol_geom as geom;

pub use core::testing;
// Re-export core application types
pub use core::{Anchor, InstanceId, ListenerId, OverlayId, OverlaySpec, Stage, TimerId};
pub use core::{error, event, listeners, poll, render, settings, style};

pub use widget::Widget;
