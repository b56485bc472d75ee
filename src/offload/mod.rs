//! Device-offloaded double-buffered engine.

mod device;
mod engine;
#[cfg(feature = "offload")]
mod shader;
#[cfg(feature = "offload")]
mod wgpu_device;

pub use device::{ComputeDevice, DeviceSelector};
pub use engine::OffloadLife;
#[cfg(feature = "offload")]
pub use wgpu_device::{AdapterSummary, WgpuBuffer, WgpuDevice, enumerate_adapters};
