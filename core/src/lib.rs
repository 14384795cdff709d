#![no_std]

extern crate alloc;

use core::fmt;
use core::ops::Index;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use catalog::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use hints::*;
pub use ledger::*;
pub use progression::*;
pub use round::*;
pub use session::*;
pub use types::*;

mod catalog;
mod cell;
mod error;
mod generator;
mod hints;
mod ledger;
mod progression;
mod round;
mod session;
mod types;

/// Hidden contents of a board before any card is flipped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardLayout {
    cards: Array2<CardValue>,
}

impl CardLayout {
    pub fn from_values(cards: Array2<CardValue>) -> Result<Self> {
        let size = usize::from(BOARD_SIZE);
        if cards.dim() != (size, size) {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self { cards })
    }

    pub fn from_rows(rows: [[CardValue; BOARD_SIZE as usize]; BOARD_SIZE as usize]) -> Self {
        let size = usize::from(BOARD_SIZE);
        Self {
            cards: Array2::from_shape_fn((size, size), |(row, col)| rows[row][col]),
        }
    }

    pub fn cards(&self) -> &Array2<CardValue> {
        &self.cards
    }

    pub fn count(&self, value: CardValue) -> CellCount {
        // at most 25 cards, always fits
        self.cards.iter().filter(|&&card| card == value).count() as CellCount
    }

    /// Composition realised by this layout.
    pub fn composition(&self) -> Composition {
        Composition::new(
            self.count(CardValue::Two),
            self.count(CardValue::Three),
            self.count(CardValue::Mine),
        )
    }
}

impl Index<Coord2> for CardLayout {
    type Output = CardValue;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cards[coords.to_nd_index()]
    }
}

/// Generates a fresh board for `level`, remembering `total_score` as the round's starting total.
pub fn new_board<R: Rng + ?Sized>(level: Level, total_score: Score, rng: &mut R) -> Result<Board> {
    let layout = generate(level, rng)?;
    Ok(Board::new(layout, level, total_score))
}

/// Why a gameplay action was ignored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    AlreadyFlipped,
    RoundOver,
    RoundInProgress,
    NotPlaying,
    OutsideIntermission,
    InsufficientFunds,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Rejection::*;
        f.write_str(match self {
            AlreadyFlipped => "card is already flipped",
            RoundOver => "round is already over",
            RoundInProgress => "round is still in progress",
            NotPlaying => "no round is being played",
            OutsideIntermission => "only possible between rounds",
            InsufficientFunds => "not enough points",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    Rejected(Rejection),
    Marked,
    Unmarked,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    Rejected(Rejection),
    Revealed(CardValue),
    HitMine,
    Won,
}

impl FlipOutcome {
    /// Whether this flip ended the round.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}
