use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Between rounds, the player may skip a level or reset the score.
    Intermission,
    Playing,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Rejected(Rejection),
    Cleared { banked: Score, level: Level },
    Failed { change: LevelChange, level: Level },
}

/// Runs consecutive rounds, carrying level and scores between them.
#[derive(Debug)]
pub struct Session<S, R> {
    ledger: SessionLedger<S>,
    rng: R,
    level: Level,
    board: Board,
    phase: Phase,
    last_change: Option<LevelChange>,
}

impl<S: ScoreStore, R: Rng> Session<S, R> {
    /// Loads saved scores and deals a level 1 board.
    pub fn open(store: S, mut rng: R) -> Result<Self> {
        let ledger = SessionLedger::open(store);
        let level = 1;
        let board = Board::generate(level, ledger.total_score(), &mut rng)?;
        log::debug!(
            "session opened, total {}, high {}",
            ledger.total_score(),
            ledger.high_score()
        );

        Ok(Self {
            ledger,
            rng,
            level,
            board,
            phase: Phase::Intermission,
            last_change: None,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn total_score(&self) -> Score {
        self.ledger.total_score()
    }

    pub fn high_score(&self) -> Score {
        self.ledger.high_score()
    }

    /// Level change caused by the most recent loss, cleared when the next round starts.
    pub fn last_level_change(&self) -> Option<LevelChange> {
        self.last_change
    }

    pub fn ledger(&self) -> &SessionLedger<S> {
        &self.ledger
    }

    pub fn start_round(&mut self) -> core::result::Result<(), Rejection> {
        self.check_intermission()?;
        self.phase = Phase::Playing;
        self.last_change = None;
        log::debug!("round started at level {}", self.level);
        Ok(())
    }

    pub fn flip(&mut self, coords: Coord2) -> Result<FlipOutcome> {
        if self.phase != Phase::Playing {
            return Ok(FlipOutcome::Rejected(Rejection::NotPlaying));
        }
        self.board.flip(coords)
    }

    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        if self.phase != Phase::Playing {
            return Ok(MarkOutcome::Rejected(Rejection::NotPlaying));
        }
        self.board.toggle_mark(coords)
    }

    /// Settles a finished round, saves, and deals the next board.
    pub fn advance(&mut self) -> Result<AdvanceOutcome> {
        if self.phase != Phase::Playing {
            return Ok(AdvanceOutcome::Rejected(Rejection::NotPlaying));
        }

        let outcome = match self.board.state() {
            RoundState::InProgress => {
                return Ok(AdvanceOutcome::Rejected(Rejection::RoundInProgress));
            }
            RoundState::Won => {
                let banked = self.board.round_score();
                self.ledger.bank_round(banked);
                self.persist();
                self.level = resolve_win(self.level);
                AdvanceOutcome::Cleared {
                    banked,
                    level: self.level,
                }
            }
            RoundState::Lost => {
                let (level, change) = resolve_loss(self.level, &mut self.rng);
                self.ledger.observe_high_score();
                self.persist();
                self.level = level;
                self.last_change = Some(change);
                AdvanceOutcome::Failed { change, level }
            }
        };

        self.deal()?;
        Ok(outcome)
    }

    /// Pays [`LEVEL_SKIP_COST`] points to move up a level and deals a new board.
    pub fn spend_points(&mut self) -> Result<SpendOutcome> {
        if let Err(reason) = self.check_intermission() {
            return Ok(SpendOutcome::Rejected {
                level: self.level,
                total_score: self.total_score(),
                reason,
            });
        }

        let outcome = spend_points(self.level, self.total_score());
        if outcome.is_accepted() {
            self.ledger.set_total_score(outcome.total_score());
            self.persist();
            self.level = outcome.level();
            self.deal()?;
        }
        Ok(outcome)
    }

    pub fn reset_score(&mut self) -> core::result::Result<(), Rejection> {
        self.check_intermission()?;
        self.ledger.reset();
        self.persist();
        Ok(())
    }

    /// Saves one last time and hands back the store.
    pub fn close(mut self) -> S {
        self.persist();
        self.ledger.into_store()
    }

    fn deal(&mut self) -> Result<()> {
        self.board = Board::generate(self.level, self.ledger.total_score(), &mut self.rng)?;
        self.phase = Phase::Intermission;
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(err) = self.ledger.persist() {
            log::warn!("Could not save scores, continuing with unsaved progress: {err}");
        }
    }

    fn check_intermission(&self) -> core::result::Result<(), Rejection> {
        if self.phase == Phase::Intermission {
            Ok(())
        } else {
            Err(Rejection::OutsideIntermission)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[derive(Debug, Default)]
    struct ReadOnlyStore;

    impl ScoreStore for ReadOnlyStore {
        fn read(&self) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }

        fn write(&mut self, _bytes: &[u8]) -> Result<()> {
            Err(GameError::PersistenceUnavailable)
        }
    }

    #[derive(Debug, Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: usize,
    }

    impl ScoreStore for CountingStore {
        fn read(&self) -> Result<Option<Vec<u8>>> {
            self.inner.read()
        }

        fn write(&mut self, bytes: &[u8]) -> Result<()> {
            self.writes += 1;
            self.inner.write(bytes)
        }
    }

    fn session(store: MemoryStore) -> Session<MemoryStore, SmallRng> {
        Session::open(store, SmallRng::seed_from_u64(17)).unwrap()
    }

    fn coords_where(board: &Board, pred: impl Fn(CardValue) -> bool) -> Vec<Coord2> {
        iter_coords()
            .filter(|&coords| pred(board.cell_at(coords).unwrap().value()))
            .collect()
    }

    fn saved(store: &MemoryStore) -> ScoreRecord {
        ScoreRecord::decode(store.bytes().unwrap()).unwrap()
    }

    #[test]
    fn opens_with_saved_scores_in_intermission() {
        let session = session(MemoryStore::with_bytes(r#"{"total_score":30,"high_score":80}"#));

        assert_eq!(session.phase(), Phase::Intermission);
        assert_eq!(session.level(), 1);
        assert_eq!((session.total_score(), session.high_score()), (30, 80));
        assert_eq!(session.board().total_score(), 30);
    }

    #[test]
    fn moves_are_ignored_between_rounds() {
        let mut session = session(MemoryStore::new());

        assert_eq!(
            session.flip((0, 0)).unwrap(),
            FlipOutcome::Rejected(Rejection::NotPlaying)
        );
        assert_eq!(
            session.toggle_mark((0, 0)).unwrap(),
            MarkOutcome::Rejected(Rejection::NotPlaying)
        );
        assert_eq!(
            session.advance().unwrap(),
            AdvanceOutcome::Rejected(Rejection::NotPlaying)
        );
    }

    #[test]
    fn winning_banks_the_round_and_levels_up() {
        let mut session = session(MemoryStore::with_bytes(r#"{"total_score":10,"high_score":10}"#));
        session.start_round().unwrap();
        let expected = session.board().composition().max_score();

        for coords in coords_where(session.board(), CardValue::is_multiplier) {
            session.flip(coords).unwrap();
        }
        assert_eq!(session.board().state(), RoundState::Won);

        let outcome = session.advance().unwrap();

        assert_eq!(
            outcome,
            AdvanceOutcome::Cleared {
                banked: expected,
                level: 2,
            }
        );
        assert_eq!(session.level(), 2);
        assert_eq!(session.total_score(), 10 + expected);
        assert_eq!(session.high_score(), 10 + expected);
        assert_eq!(session.phase(), Phase::Intermission);
        assert_eq!(session.board().level(), 2);
        assert_eq!(session.board().total_score(), 10 + expected);

        let store = session.close();
        assert_eq!(saved(&store).total_score, 10 + expected);
    }

    #[test]
    fn losing_keeps_the_total_and_records_the_change() {
        let mut session = session(MemoryStore::with_bytes(r#"{"total_score":70,"high_score":20}"#));
        session.start_round().unwrap();
        let mine = coords_where(session.board(), CardValue::is_mine)[0];

        assert_eq!(session.flip(mine).unwrap(), FlipOutcome::HitMine);
        let outcome = session.advance().unwrap();

        let AdvanceOutcome::Failed { change, level } = outcome else {
            panic!("expected a failed round, got {outcome:?}");
        };
        assert_eq!(level, change.apply(1));
        assert_eq!(session.level(), 1);
        assert_eq!(session.last_level_change(), Some(change));
        assert_eq!((session.total_score(), session.high_score()), (70, 70));
        assert_eq!(
            saved(session.ledger().store()),
            ScoreRecord {
                total_score: 70,
                high_score: 70,
            }
        );

        session.start_round().unwrap();
        assert_eq!(session.last_level_change(), None);
    }

    #[test]
    fn unfinished_round_cannot_advance() {
        let mut session = session(MemoryStore::new());
        session.start_round().unwrap();

        assert_eq!(
            session.advance().unwrap(),
            AdvanceOutcome::Rejected(Rejection::RoundInProgress)
        );
        assert_eq!(
            session.start_round(),
            Err(Rejection::OutsideIntermission)
        );
    }

    #[test]
    fn spending_needs_enough_points() {
        let mut session = session(MemoryStore::with_bytes(r#"{"total_score":50,"high_score":50}"#));

        let outcome = session.spend_points().unwrap();

        assert!(!outcome.is_accepted());
        assert_eq!((session.level(), session.total_score()), (1, 50));
    }

    #[test]
    fn spending_deals_a_harder_board_and_saves() {
        let mut session = session(MemoryStore::with_bytes(r#"{"total_score":150,"high_score":150}"#));

        let outcome = session.spend_points().unwrap();

        assert_eq!(
            outcome,
            SpendOutcome::Accepted {
                level: 2,
                total_score: 50,
            }
        );
        assert_eq!(session.board().level(), 2);
        assert_eq!(session.high_score(), 150);
        assert_eq!(
            saved(session.ledger().store()),
            ScoreRecord {
                total_score: 50,
                high_score: 150,
            }
        );
    }

    #[test]
    fn spending_saves_the_debit_once() {
        let store = CountingStore {
            inner: MemoryStore::with_bytes(r#"{"total_score":250,"high_score":250}"#),
            writes: 0,
        };
        let mut session = Session::open(store, SmallRng::seed_from_u64(9)).unwrap();

        assert!(session.spend_points().unwrap().is_accepted());

        let store = session.ledger().store();
        assert_eq!(store.writes, 1);
        assert_eq!(
            saved(&store.inner),
            ScoreRecord {
                total_score: 150,
                high_score: 250,
            }
        );
    }

    #[test]
    fn menu_actions_are_refused_mid_round() {
        let mut session = session(MemoryStore::with_bytes(r#"{"total_score":500,"high_score":500}"#));
        session.start_round().unwrap();

        let outcome = session.spend_points().unwrap();
        assert_eq!(
            outcome,
            SpendOutcome::Rejected {
                level: 1,
                total_score: 500,
                reason: Rejection::OutsideIntermission,
            }
        );
        assert_eq!(session.reset_score(), Err(Rejection::OutsideIntermission));
        assert_eq!(session.total_score(), 500);
    }

    #[test]
    fn reset_zeroes_total_and_saves() {
        let mut session = session(MemoryStore::with_bytes(r#"{"total_score":90,"high_score":120}"#));

        session.reset_score().unwrap();

        assert_eq!((session.total_score(), session.high_score()), (0, 120));
        assert_eq!(
            saved(&session.close()),
            ScoreRecord {
                total_score: 0,
                high_score: 120,
            }
        );
    }

    #[test]
    fn save_failures_do_not_stop_play() {
        let mut session = Session::open(ReadOnlyStore, SmallRng::seed_from_u64(4)).unwrap();
        session.start_round().unwrap();
        for coords in coords_where(session.board(), CardValue::is_multiplier) {
            session.flip(coords).unwrap();
        }

        let outcome = session.advance().unwrap();

        assert!(matches!(outcome, AdvanceOutcome::Cleared { level: 2, .. }));
        assert!(session.total_score() > 0);
        assert_eq!(session.phase(), Phase::Intermission);
    }
}
