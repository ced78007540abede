/// Harness for driving a stage in tests.
pub mod harness;
/// Recording renderer and callbacks.
pub mod render;

pub use harness::Harness;
pub use render::{OpenLog, RecordingRenderer};
