use crate::*;
pub use random::*;

mod random;

pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}

/// Which cells around the first move are kept free of mines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirstMovePolicy {
    /// No guarantee, the first move may hit a mine.
    Random,
    /// The first cell is never a mine.
    SimpleSafe,
    /// The first cell and all of its neighbors are mine free, so it always opens a region.
    #[default]
    FirstMoveZero,
}

impl FirstMovePolicy {
    /// Positions that must stay mine free for a first move at `start`.
    pub fn excluded_cells(self, size: Coord2, start: Coord2) -> Vec<Coord2> {
        use FirstMovePolicy::*;
        match self {
            Random => Vec::new(),
            SimpleSafe => alloc::vec![start],
            FirstMoveZero => core::iter::once(start)
                .chain(neighbors(start, size))
                .collect(),
        }
    }

    /// Fallback used when a layout cannot honor this policy.
    pub const fn weaker(self) -> Option<Self> {
        use FirstMovePolicy::*;
        match self {
            FirstMoveZero => Some(SimpleSafe),
            SimpleSafe => Some(Random),
            Random => None,
        }
    }
}
