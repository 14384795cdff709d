use rand::Rng;
use rand::seq::IndexedRandom;

use crate::*;
pub use shuffled::*;

mod shuffled;

pub trait LayoutGenerator {
    fn generate(self, composition: Composition) -> Result<CardLayout>;
}

/// Picks one of the level's compositions uniformly at random.
pub fn choose_composition<R: Rng + ?Sized>(level: Level, rng: &mut R) -> Result<Composition> {
    compositions_for(level)
        .choose(rng)
        .copied()
        .ok_or(GameError::InvalidComposition)
}

/// Builds a shuffled layout for `level`, consuming randomness only from `rng`.
pub fn generate<R: Rng + ?Sized>(level: Level, rng: &mut R) -> Result<CardLayout> {
    let composition = choose_composition(level, rng)?;
    log::debug!("level {level}: generating from {composition:?}");
    generate_from(composition, rng)
}

pub fn generate_from<R: Rng + ?Sized>(composition: Composition, rng: &mut R) -> Result<CardLayout> {
    ShuffledLayoutGenerator::new(rng).generate(composition)
}
