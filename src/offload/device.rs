//! The seam between the offload engine and whatever evaluates the rule.

use crate::error::Result;
use crate::topology::Grid;

/// Which compute device to open: `platform` picks the API family, `device`
/// an adapter within it. Both are zero-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceSelector {
    pub platform: usize,
    pub device: usize,
}

/// An external compute unit holding device-resident cell buffers.
///
/// A buffer holds one cell per slot, 0 = dead and 1 = alive. `dispatch`
/// enqueues one logical invocation per cell that reads `current` and writes
/// the successor generation into `scratch`; it may return before the work
/// has run. `finish` blocks until everything enqueued so far has completed.
pub trait ComputeDevice {
    type Buffer;

    /// Human-readable adapter name for logs.
    fn describe(&self) -> String;

    fn upload(&mut self, cells: &[u8]) -> Result<Self::Buffer>;

    /// Zero-initialized buffer of `cells` slots.
    fn allocate(&mut self, cells: usize) -> Result<Self::Buffer>;

    fn dispatch(&mut self, current: &Self::Buffer, scratch: &Self::Buffer, grid: Grid)
    -> Result<()>;

    fn finish(&mut self) -> Result<()>;

    fn download(&mut self, buffer: &Self::Buffer, cells: usize) -> Result<Vec<u8>>;
}
