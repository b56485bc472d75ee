//! B3/S23 transition rule.

/// Largest neighbour count a cell can have.
pub const MAX_NEIGHBORS: usize = 8;

#[inline(always)]
pub fn next_alive(alive: bool, neighbors: u8) -> bool {
    neighbors == 3 || (alive && neighbors == 2)
}

/// Next-state lookup indexed by `(state, neighbour count)`.
pub struct RuleTable {
    table: [[u8; MAX_NEIGHBORS + 1]; 2],
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleTable {
    pub const fn new() -> Self {
        let mut table = [[0u8; MAX_NEIGHBORS + 1]; 2];
        let mut count = 0;
        while count <= MAX_NEIGHBORS {
            table[0][count] = (count == 3) as u8;
            table[1][count] = (count == 2 || count == 3) as u8;
            count += 1;
        }
        Self { table }
    }

    /// `state` is 0 or 1, `neighbors` is at most 8.
    #[inline(always)]
    pub fn lookup(&self, state: u8, neighbors: u8) -> u8 {
        self.table[(state & 1) as usize][neighbors as usize]
    }
}

pub(crate) static RULE_TABLE: RuleTable = RuleTable::new();
