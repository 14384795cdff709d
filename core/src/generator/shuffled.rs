use alloc::vec::Vec;
use core::iter::repeat_n;
use ndarray::Array2;
use rand::seq::SliceRandom;

use super::*;

/// Lays out the exact counts of a composition and shuffles them uniformly over the board.
#[derive(Debug)]
pub struct ShuffledLayoutGenerator<'a, R: ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> ShuffledLayoutGenerator<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + ?Sized> LayoutGenerator for ShuffledLayoutGenerator<'_, R> {
    fn generate(self, composition: Composition) -> Result<CardLayout> {
        let ones = composition.ones().inspect_err(|_| {
            log::error!(
                "Composition {:?} does not fit in {} cells",
                composition,
                TOTAL_CELLS
            );
        })?;

        let mut cards = Vec::with_capacity(TOTAL_CELLS.into());
        cards.extend(repeat_n(CardValue::Mine, composition.mines.into()));
        cards.extend(repeat_n(CardValue::Two, composition.twos.into()));
        cards.extend(repeat_n(CardValue::Three, composition.threes.into()));
        cards.extend(repeat_n(CardValue::One, ones.into()));
        cards.shuffle(self.rng);

        let size = usize::from(BOARD_SIZE);
        let cards = Array2::from_shape_vec((size, size), cards)
            .map_err(|_| GameError::InvalidBoardShape)?;
        let layout = CardLayout::from_values(cards)?;

        // double check counts
        let actual = layout.composition();
        if actual != composition {
            log::warn!(
                "Generated layout mismatch, actual: {:?}, requested: {:?}",
                actual,
                composition
            );
        }
        Ok(layout)
    }
}
