// ── Domain model ──

pub mod device;
pub mod state;

pub use device::{DeviceDescriptor, Field};
pub use state::DesiredState;
