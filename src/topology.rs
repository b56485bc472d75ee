//! Toroidal grid addressing.
//!
//! Cells live in one flat row-major array. Every neighbour of a cell is
//! reached through a signed offset from its own index; border cells get
//! offsets that jump to the opposite edge instead of leaving the array.

use crate::error::{LifeError, Result};

/// Fixed grid dimensions. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
}

/// Signed offsets from a cell index to its eight toroidal neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NeighborOffsets {
    pub top_left: isize,
    pub top: isize,
    pub top_right: isize,
    pub left: isize,
    pub right: isize,
    pub bot_left: isize,
    pub bot: isize,
    pub bot_right: isize,
}

impl NeighborOffsets {
    fn from_axes(left: isize, right: isize, top: isize, bot: isize) -> Self {
        Self {
            top_left: top + left,
            top,
            top_right: top + right,
            left,
            right,
            bot_left: bot + left,
            bot,
            bot_right: bot + right,
        }
    }

    /// Offsets in the canonical order: top-left, top, top-right, left, right,
    /// bottom-left, bottom, bottom-right.
    #[inline(always)]
    pub fn as_array(&self) -> [isize; 8] {
        [
            self.top_left,
            self.top,
            self.top_right,
            self.left,
            self.right,
            self.bot_left,
            self.bot,
            self.bot_right,
        ]
    }
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LifeError::InvalidDimensions { width, height });
        }
        // Signed offsets must be able to span the whole array.
        match width.checked_mul(height) {
            Some(total) if total <= isize::MAX as usize => Ok(Self { width, height }),
            _ => Err(LifeError::InvalidDimensions { width, height }),
        }
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn total(&self) -> usize {
        self.width * self.height
    }

    /// Column index of the right border (`width - 1`).
    #[inline(always)]
    pub fn right_border(&self) -> usize {
        self.width - 1
    }

    /// Flat index of the first cell of the bottom row (`total - width`).
    #[inline(always)]
    pub fn bottom_border(&self) -> usize {
        self.total() - self.width
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    #[inline(always)]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        debug_assert!(index < self.total());
        (index % self.width, index / self.width)
    }

    /// Neighbour offsets with explicit border tests.
    #[inline(always)]
    pub fn neighbor_offsets(&self, x: usize, y: usize) -> NeighborOffsets {
        let w = self.width as isize;
        let right_border = self.right_border() as isize;
        let bottom_border = self.bottom_border() as isize;

        let left = if x == 0 { right_border } else { -1 };
        let right = if x == self.right_border() {
            -right_border
        } else {
            1
        };
        let top = if y == 0 { bottom_border } else { -w };
        let bot = if y == self.height - 1 {
            -bottom_border
        } else {
            w
        };
        NeighborOffsets::from_axes(left, right, top, bot)
    }

    /// Same offsets as [`Grid::neighbor_offsets`], computed by multiplying
    /// with border predicates instead of branching.
    #[inline(always)]
    pub fn neighbor_offsets_branchless(&self, x: usize, y: usize) -> NeighborOffsets {
        let w = self.width as isize;
        let right_border = self.right_border() as isize;
        let bottom_border = self.bottom_border() as isize;

        let on_left = (x == 0) as isize;
        let on_right = (x == self.right_border()) as isize;
        let on_top = (y == 0) as isize;
        let on_bot = (y == self.height - 1) as isize;

        let left = right_border * on_left - (1 - on_left);
        let right = -right_border * on_right + (1 - on_right);
        let top = bottom_border * on_top - w * (1 - on_top);
        let bot = -bottom_border * on_bot + w * (1 - on_bot);
        NeighborOffsets::from_axes(left, right, top, bot)
    }

    /// Flat indices of the eight neighbours of `(x, y)`, in the order of
    /// [`NeighborOffsets::as_array`].
    ///
    /// On grids narrower or shorter than three cells the same index can
    /// appear more than once, including the cell's own index.
    #[inline(always)]
    pub fn neighbor_indices(&self, x: usize, y: usize) -> [usize; 8] {
        let base = self.index(x, y) as isize;
        self.neighbor_offsets(x, y)
            .as_array()
            .map(|offset| (base + offset) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::Grid;

    fn reference_indices(grid: &Grid, x: usize, y: usize) -> [usize; 8] {
        let w = grid.width();
        let h = grid.height();
        let xl = (x + w - 1) % w;
        let xr = (x + 1) % w;
        let yt = (y + h - 1) % h;
        let yb = (y + 1) % h;
        [
            yt * w + xl,
            yt * w + x,
            yt * w + xr,
            y * w + xl,
            y * w + xr,
            yb * w + xl,
            yb * w + x,
            yb * w + xr,
        ]
    }

    const SHAPES: &[(usize, usize)] = &[
        (1, 1),
        (1, 5),
        (5, 1),
        (2, 2),
        (3, 7),
        (7, 3),
        (16, 9),
    ];

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(Grid::new(0, 4).is_err());
        assert!(Grid::new(4, 0).is_err());
        assert!(Grid::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn branchless_offsets_match_conditional_offsets() {
        for &(w, h) in SHAPES {
            let grid = Grid::new(w, h).unwrap();
            for y in 0..h {
                for x in 0..w {
                    assert_eq!(
                        grid.neighbor_offsets(x, y),
                        grid.neighbor_offsets_branchless(x, y),
                        "offset mismatch at ({x},{y}) on {w}x{h}"
                    );
                }
            }
        }
    }

    #[test]
    fn neighbor_indices_wrap_on_every_edge() {
        for &(w, h) in SHAPES {
            let grid = Grid::new(w, h).unwrap();
            for y in 0..h {
                for x in 0..w {
                    assert_eq!(
                        grid.neighbor_indices(x, y),
                        reference_indices(&grid, x, y),
                        "index mismatch at ({x},{y}) on {w}x{h}"
                    );
                }
            }
        }
    }

    #[test]
    fn corners_compose_both_wraps() {
        let grid = Grid::new(4, 3).unwrap();
        let origin = grid.neighbor_indices(0, 0);
        assert_eq!(origin[0], grid.index(3, 2));
        assert_eq!(origin[2], grid.index(1, 2));
        assert_eq!(origin[5], grid.index(3, 1));

        let far = grid.neighbor_indices(3, 2);
        assert_eq!(far[7], grid.index(0, 0));
        assert_eq!(far[4], grid.index(0, 2));
        assert_eq!(far[6], grid.index(3, 0));
    }

    #[test]
    fn single_cell_grid_is_its_own_neighbor() {
        let grid = Grid::new(1, 1).unwrap();
        assert_eq!(grid.neighbor_indices(0, 0), [0; 8]);
    }
}
