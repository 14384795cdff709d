use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    InProgress,
    Won,
    Lost,
}

impl RoundState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::InProgress
    }
}

/// One attempt at a level: the dealt cards, their clues and the player's progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    hints: Hints,
    composition: Composition,
    level: Level,
    round_score: Score,
    total_score: Score,
    multipliers_left: CellCount,
    state: RoundState,
    triggered_mine: Option<Coord2>,
}

impl Board {
    pub fn new(layout: CardLayout, level: Level, total_score: Score) -> Self {
        let hints = compute_hints(&layout);
        let composition = layout.composition();
        let multipliers_left = composition.multipliers();
        // nothing to uncover means the round is already cleared
        let state = if multipliers_left == 0 {
            RoundState::Won
        } else {
            RoundState::InProgress
        };

        Self {
            cells: layout.cards().map(|&value| Cell::new(value)),
            hints,
            composition,
            level,
            round_score: 1,
            total_score,
            multipliers_left,
            state,
            triggered_mine: None,
        }
    }

    pub fn generate<R: Rng + ?Sized>(level: Level, total_score: Score, rng: &mut R) -> Result<Self> {
        new_board(level, total_score, rng)
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn round_score(&self) -> Score {
        self.round_score
    }

    /// Total score at the time the round was dealt.
    pub fn total_score(&self) -> Score {
        self.total_score
    }

    pub fn hints(&self) -> &Hints {
        &self.hints
    }

    pub fn row_hints(&self) -> &[LineHint] {
        &self.hints.rows
    }

    pub fn col_hints(&self) -> &[LineHint] {
        &self.hints.cols
    }

    pub fn composition(&self) -> Composition {
        self.composition
    }

    pub fn multipliers_left(&self) -> CellCount {
        self.multipliers_left
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<&Cell> {
        let coords = validate_coords(coords)?;
        Ok(&self.cells[coords.to_nd_index()])
    }

    pub fn face_at(&self, coords: Coord2) -> Result<CellFace> {
        self.cell_at(coords).map(Cell::face)
    }

    pub fn marked_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_marked()).count() as CellCount
    }

    /// Every card face up, for showing the board once the round is over.
    pub fn reveal_all(&self) -> Array2<CellFace> {
        self.cells.map(|cell| CellFace::Revealed(cell.value()))
    }

    /// The player's current view of the board.
    pub fn faces(&self) -> Array2<CellFace> {
        self.cells.map(Cell::face)
    }

    pub fn flip(&mut self, coords: Coord2) -> Result<FlipOutcome> {
        use FlipOutcome::*;

        let coords = validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];

        if cell.is_flipped() {
            return Ok(Rejected(Rejection::AlreadyFlipped));
        }
        if self.state.is_finished() {
            return Ok(Rejected(Rejection::RoundOver));
        }

        cell.flip();
        let value = cell.value();

        if value.is_mine() {
            log::debug!("{coords:?} was a mine, round lost");
            self.triggered_mine = Some(coords);
            self.end_round(false);
            return Ok(HitMine);
        }

        if value.is_multiplier() {
            self.round_score = self.round_score.saturating_mul(value.multiplier());
            self.multipliers_left -= 1;
        }

        if self.multipliers_left == 0 {
            log::debug!("all multipliers found, round won with {}", self.round_score);
            self.end_round(true);
            Ok(Won)
        } else {
            Ok(Revealed(value))
        }
    }

    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use MarkOutcome::*;

        let coords = validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];

        Ok(if cell.is_flipped() {
            Rejected(Rejection::AlreadyFlipped)
        } else if self.state.is_finished() {
            Rejected(Rejection::RoundOver)
        } else if cell.toggle_mark() {
            Marked
        } else {
            Unmarked
        })
    }

    fn end_round(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            RoundState::Won
        } else {
            RoundState::Lost
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CardValue::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn board(rows: [[CardValue; 5]; 5]) -> Board {
        Board::new(CardLayout::from_rows(rows), 1, 0)
    }

    fn two_and_three() -> Board {
        board([
            [Two, One, One, One, Mine],
            [One, Three, One, One, One],
            [One, One, One, One, One],
            [Mine, One, One, One, One],
            [One, One, One, One, Mine],
        ])
    }

    fn coords_of(board: &Board, value: CardValue) -> impl Iterator<Item = Coord2> + '_ {
        iter_coords().filter(move |&coords| board.cell_at(coords).unwrap().value() == value)
    }

    #[test]
    fn multipliers_compound_the_round_score() {
        let mut board = two_and_three();

        assert_eq!(board.flip((0, 0)).unwrap(), FlipOutcome::Revealed(Two));
        assert_eq!(board.round_score(), 2);
        assert_eq!(board.flip((1, 1)).unwrap(), FlipOutcome::Won);
        assert_eq!(board.round_score(), 6);
        assert_eq!(board.state(), RoundState::Won);
    }

    #[test]
    fn ones_leave_the_score_alone() {
        let mut board = two_and_three();

        assert_eq!(board.flip((2, 2)).unwrap(), FlipOutcome::Revealed(One));
        assert_eq!(board.round_score(), 1);
        assert_eq!(board.state(), RoundState::InProgress);
    }

    #[test]
    fn flipping_twice_changes_nothing() {
        let mut board = two_and_three();
        board.flip((0, 0)).unwrap();
        let before = board.clone();

        let outcome = board.flip((0, 0)).unwrap();

        assert_eq!(outcome, FlipOutcome::Rejected(Rejection::AlreadyFlipped));
        assert_eq!(board, before);
    }

    #[test]
    fn mine_ends_the_round_regardless_of_score() {
        let mut board = two_and_three();
        board.flip((0, 0)).unwrap();

        assert_eq!(board.flip((0, 4)).unwrap(), FlipOutcome::HitMine);
        assert_eq!(board.state(), RoundState::Lost);
        assert_eq!(board.triggered_mine(), Some((0, 4)));
        assert_eq!(board.round_score(), 2);
    }

    #[test]
    fn finished_board_is_frozen() {
        let mut board = two_and_three();
        board.flip((3, 0)).unwrap();
        let before = board.clone();

        assert_eq!(
            board.flip((0, 0)).unwrap(),
            FlipOutcome::Rejected(Rejection::RoundOver)
        );
        assert_eq!(
            board.toggle_mark((1, 1)).unwrap(),
            MarkOutcome::Rejected(Rejection::RoundOver)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn board_without_multipliers_starts_won() {
        let mut rng = SmallRng::seed_from_u64(3);
        let layout = ShuffledLayoutGenerator::new(&mut rng)
            .generate(Composition::new(0, 0, 6))
            .unwrap();
        let mut board = Board::new(layout, 1, 0);

        assert_eq!(board.state(), RoundState::Won);
        assert_eq!(board.round_score(), 1);

        let safe = coords_of(&board, One).next().unwrap();
        assert_eq!(
            board.flip(safe).unwrap(),
            FlipOutcome::Rejected(Rejection::RoundOver)
        );
        assert_eq!(board.state(), RoundState::Won);
        assert_eq!(board.round_score(), 1);
    }

    #[test]
    fn won_only_after_every_multiplier() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut board = Board::generate(6, 0, &mut rng).unwrap();
        let multipliers: alloc::vec::Vec<_> = iter_coords()
            .filter(|&coords| board.cell_at(coords).unwrap().value().is_multiplier())
            .collect();
        let (last, rest) = multipliers.split_last().unwrap();

        for &coords in rest {
            assert!(matches!(board.flip(coords).unwrap(), FlipOutcome::Revealed(_)));
            assert_eq!(board.state(), RoundState::InProgress);
        }
        assert_eq!(board.multipliers_left(), 1);
        assert_eq!(board.flip(*last).unwrap(), FlipOutcome::Won);
        assert_eq!(board.round_score(), board.composition().max_score());
    }

    #[test]
    fn marks_toggle_only_on_hidden_cells() {
        let mut board = two_and_three();

        assert_eq!(board.toggle_mark((0, 4)).unwrap(), MarkOutcome::Marked);
        assert_eq!(board.face_at((0, 4)).unwrap(), CellFace::Marked);
        assert_eq!(board.marked_count(), 1);
        assert_eq!(board.toggle_mark((0, 4)).unwrap(), MarkOutcome::Unmarked);
        assert_eq!(board.face_at((0, 4)).unwrap(), CellFace::Hidden);

        board.flip((2, 2)).unwrap();
        assert_eq!(
            board.toggle_mark((2, 2)).unwrap(),
            MarkOutcome::Rejected(Rejection::AlreadyFlipped)
        );
        assert_eq!(board.round_score(), 1);
        assert_eq!(board.state(), RoundState::InProgress);
    }

    #[test]
    fn out_of_range_coordinates_are_errors() {
        let mut board = two_and_three();
        let before = board.clone();

        assert_eq!(board.flip((5, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.toggle_mark((0, 5)), Err(GameError::InvalidCoords));
        assert_eq!(board.cell_at((9, 9)).err(), Some(GameError::InvalidCoords));
        assert_eq!(board, before);
    }

    #[test]
    fn hints_do_not_change_during_play() {
        let mut board = two_and_three();
        let hints = *board.hints();

        board.flip((0, 0)).unwrap();
        board.toggle_mark((4, 4)).unwrap();

        assert_eq!(*board.hints(), hints);
        assert_eq!(board.row_hints()[0], LineHint { points: 5, mines: 1 });
        assert_eq!(board.col_hints()[0], LineHint { points: 5, mines: 1 });
    }

    #[test]
    fn reveal_all_shows_hidden_cards() {
        let board = two_and_three();

        let faces = board.reveal_all();

        assert_eq!(faces[[0, 4]], CellFace::Revealed(Mine));
        assert_eq!(board.faces()[[0, 4]], CellFace::Hidden);
    }
}
