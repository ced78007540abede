//! Core types for the parasol overlay library.

// Core modules - public
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// Reference and document listeners.
pub mod listeners;
/// Rendering interfaces.
pub mod render;
/// Stage-wide settings.
pub mod settings;
/// Style resolver seam.
pub mod style;
/// Testing utilities.
pub mod testing;

// Core modules - internal
/// Identifier types.
pub mod id;
/// Timer heap.
pub mod poll;
/// The overlay host.
pub mod stage;

// Public exports from internal modules
pub use id::{InstanceId, ListenerId, OverlayId, TimerId};
pub use stage::{Anchor, OverlaySpec, Stage};
