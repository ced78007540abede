//! Built-in overlay widgets.

/// Modal dialog and the static modal manager.
pub mod modal;
/// Confirmation popover.
pub mod popconfirm;
/// Plain popover.
pub mod popper;

pub use modal::{Modal, ModalPatch, ModalProps, StaticModals};
pub use popconfirm::PopConfirm;
pub use popper::Popper;
