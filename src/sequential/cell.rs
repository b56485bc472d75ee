//! Packed cell byte: bit 0 is the alive flag, bits 1..=7 hold the live
//! neighbour count (0..=8).

pub const ALIVE: u8 = 0x01;
/// One neighbour in the packed count; bit 0 is taken by the state.
pub const NEIGHBOR_STEP: u8 = 0x02;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct Cell(pub u8);

impl Cell {
    pub const DEAD: Cell = Cell(0);

    #[inline(always)]
    pub fn is_alive(self) -> bool {
        self.0 & ALIVE != 0
    }

    #[inline(always)]
    pub fn neighbor_count(self) -> u8 {
        self.0 >> 1
    }

    #[inline(always)]
    pub fn toggled(self) -> Cell {
        Cell(self.0 ^ ALIVE)
    }

    /// Cell with its stored count moved by one neighbour in either direction.
    #[inline(always)]
    pub fn with_neighbor(self, born: bool) -> Cell {
        if born {
            Cell(self.0.wrapping_add(NEIGHBOR_STEP))
        } else {
            Cell(self.0.wrapping_sub(NEIGHBOR_STEP))
        }
    }

    /// Character used by the neighbour debug rendering.
    pub fn debug_char(self) -> char {
        if self.is_alive() {
            'x'
        } else {
            char::from(b'0' + self.neighbor_count())
        }
    }
}
