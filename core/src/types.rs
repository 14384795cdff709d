use crate::{GameError, Result};

/// Width and height of every board.
pub const BOARD_SIZE: Coord = 5;

/// Number of cells on a board.
pub const TOTAL_CELLS: CellCount = mult(BOARD_SIZE, BOARD_SIZE);

/// Single coordinate axis used for row and column positions.
pub type Coord = u8;

/// Count type used for composition counts and total-cell counts.
pub type CellCount = u8;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Difficulty tier, starts at 1.
pub type Level = u32;

/// Score type for round, total and high scores.
pub type Score = u64;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    a.saturating_mul(b)
}

/// Iterates every board position in row-major order.
pub fn iter_coords() -> impl Iterator<Item = Coord2> {
    (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| (row, col)))
}

pub const fn in_bounds((row, col): Coord2) -> bool {
    row < BOARD_SIZE && col < BOARD_SIZE
}

pub fn validate_coords(coords: Coord2) -> Result<Coord2> {
    if in_bounds(coords) {
        Ok(coords)
    } else {
        Err(GameError::InvalidCoords)
    }
}
