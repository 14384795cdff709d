use serde::{Deserialize, Serialize};

use crate::Score;

/// Hidden face of a card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardValue {
    Mine,
    One,
    Two,
    Three,
}

impl CardValue {
    /// Point value, `0` for mines.
    pub const fn points(self) -> u8 {
        match self {
            Self::Mine => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    /// Whether revealing this card changes the round score.
    pub const fn is_multiplier(self) -> bool {
        matches!(self, Self::Two | Self::Three)
    }

    pub const fn multiplier(self) -> Score {
        self.points() as Score
    }
}

impl Default for CardValue {
    fn default() -> Self {
        Self::One
    }
}

/// One grid position as tracked by a round.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    value: CardValue,
    flipped: bool,
    marked: bool,
}

impl Cell {
    pub const fn new(value: CardValue) -> Self {
        Self {
            value,
            flipped: false,
            marked: false,
        }
    }

    pub const fn value(&self) -> CardValue {
        self.value
    }

    pub const fn is_mine(&self) -> bool {
        self.value.is_mine()
    }

    pub const fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub const fn is_marked(&self) -> bool {
        self.marked
    }

    /// What the player is allowed to see of this cell.
    pub const fn face(&self) -> CellFace {
        if self.flipped {
            CellFace::Revealed(self.value)
        } else if self.marked {
            CellFace::Marked
        } else {
            CellFace::Hidden
        }
    }

    pub(crate) fn flip(&mut self) {
        self.flipped = true;
        self.marked = false;
    }

    pub(crate) fn toggle_mark(&mut self) -> bool {
        debug_assert!(!self.flipped, "flipped cells cannot be marked");
        self.marked = !self.marked;
        self.marked
    }
}

/// Player-visible state of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellFace {
    Hidden,
    Marked,
    Revealed(CardValue),
}

impl Default for CellFace {
    fn default() -> Self {
        Self::Hidden
    }
}
