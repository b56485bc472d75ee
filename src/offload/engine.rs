use super::device::ComputeDevice;
use crate::board::Board;
use crate::error::Result;
use crate::topology::Grid;

/// Double-buffered engine whose rule runs on a [`ComputeDevice`].
///
/// The two device buffers sit in named slots. After every generation the
/// slots trade places, so `current` always holds the newest state and the
/// old one becomes the next write target. Nothing is copied between them.
///
/// A failed dispatch aborts the run. The contents of both buffers are
/// undefined afterwards and the engine should be dropped.
pub struct OffloadLife<D: ComputeDevice> {
    device: D,
    grid: Grid,
    current: D::Buffer,
    scratch: D::Buffer,
    generation: u64,
}

impl<D: ComputeDevice> OffloadLife<D> {
    /// Upload `board` once and allocate the scratch buffer.
    pub fn new(mut device: D, board: &Board) -> Result<Self> {
        let grid = board.grid();
        let current = device.upload(board.cells())?;
        let scratch = device.allocate(grid.total())?;
        tracing::debug!(
            device = %device.describe(),
            width = grid.width(),
            height = grid.height(),
            "offload buffers allocated"
        );
        Ok(Self {
            device,
            grid,
            current,
            scratch,
            generation: 0,
        })
    }

    pub fn step(&mut self) -> Result<()> {
        self.device
            .dispatch(&self.current, &self.scratch, self.grid)?;
        self.device.finish()?;
        std::mem::swap(&mut self.current, &mut self.scratch);
        self.generation += 1;
        Ok(())
    }

    pub fn step_n(&mut self, n: u64) -> Result<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Copy the `current` buffer back to the host.
    pub fn read_board(&mut self) -> Result<Board> {
        let states = self.device.download(&self.current, self.grid.total())?;
        Ok(Board::from_states(self.grid, &states))
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
