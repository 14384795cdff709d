use serde::{Deserialize, Serialize};

use crate::*;

/// How many of each card kind a board holds. Whatever is left over is filled with ×1 cards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Composition {
    pub twos: CellCount,
    pub threes: CellCount,
    pub mines: CellCount,
}

impl Composition {
    pub const fn new(twos: CellCount, threes: CellCount, mines: CellCount) -> Self {
        Self {
            twos,
            threes,
            mines,
        }
    }

    /// Cards that are not ×1, or `None` if the sum overflows.
    const fn special_cards(&self) -> Option<CellCount> {
        match self.twos.checked_add(self.threes) {
            Some(sum) => sum.checked_add(self.mines),
            None => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.special_cards() {
            Some(count) if count <= TOTAL_CELLS => Ok(()),
            _ => Err(GameError::InvalidComposition),
        }
    }

    /// Number of ×1 cards.
    pub fn ones(&self) -> Result<CellCount> {
        self.validate()?;
        Ok(TOTAL_CELLS - self.twos - self.threes - self.mines)
    }

    pub const fn multipliers(&self) -> CellCount {
        self.twos.saturating_add(self.threes)
    }

    /// Round score reached by revealing every multiplier.
    pub const fn max_score(&self) -> Score {
        let twos = (2 as Score).saturating_pow(self.twos as u32);
        twos.saturating_mul((3 as Score).saturating_pow(self.threes as u32))
    }
}

const fn c(twos: CellCount, threes: CellCount, mines: CellCount) -> Composition {
    Composition::new(twos, threes, mines)
}

const LEVEL_CATALOG: [[Composition; 5]; 8] = [
    [c(3, 1, 6), c(0, 3, 6), c(5, 0, 6), c(2, 2, 6), c(4, 1, 6)],
    [c(1, 3, 7), c(6, 0, 7), c(3, 2, 7), c(0, 4, 7), c(5, 1, 7)],
    [c(2, 3, 8), c(7, 0, 8), c(4, 2, 8), c(1, 4, 8), c(6, 1, 8)],
    [c(3, 3, 8), c(0, 5, 8), c(8, 0, 10), c(5, 2, 10), c(2, 4, 10)],
    [c(7, 1, 10), c(4, 3, 10), c(1, 5, 10), c(9, 0, 10), c(6, 2, 10)],
    [c(3, 4, 10), c(0, 6, 10), c(8, 1, 10), c(5, 3, 10), c(2, 5, 10)],
    [c(7, 2, 10), c(4, 4, 10), c(1, 6, 13), c(9, 1, 13), c(6, 3, 10)],
    [c(0, 7, 10), c(8, 2, 10), c(5, 4, 10), c(2, 6, 10), c(7, 3, 10)],
];

/// Highest level with its own compositions, later levels reuse it.
pub const fn max_level() -> Level {
    LEVEL_CATALOG.len() as Level
}

/// Candidate compositions for `level`.
///
/// Levels past [`max_level`] clamp to it and level 0 is treated as level 1.
pub fn compositions_for(level: Level) -> &'static [Composition] {
    let index = level.clamp(1, max_level()) - 1;
    &LEVEL_CATALOG[index as usize]
}
