use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::*;

/// Byte-level storage for the persisted scores.
pub trait ScoreStore {
    /// Returns `Ok(None)` when nothing was saved yet.
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replaces whatever was stored before.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Keeps the scores in memory only, nothing survives the process.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    bytes: Option<Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(bytes.into()),
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.bytes.clone())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.bytes = Some(bytes.to_vec());
        Ok(())
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for &mut S {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        (**self).read()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }
}

/// Shape written by [`SessionLedger::save`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub total_score: Score,
    pub high_score: Score,
}

impl ScoreRecord {
    /// Reads a stored record, salvaging what it can from older or damaged data.
    ///
    /// Old saves hold a bare number, which is taken as the total score. Missing or unreadable
    /// fields of a record count as zero.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|_| GameError::MalformedPersistedState)?;

        match value {
            Value::Object(fields) => {
                let field = |name: &str| fields.get(name).and_then(Value::as_u64).unwrap_or(0);
                Ok(Self {
                    total_score: field("total_score"),
                    high_score: field("high_score"),
                })
            }
            Value::Number(total) => {
                let total_score = total.as_u64().ok_or(GameError::MalformedPersistedState)?;
                log::info!("Migrating legacy score save, total score {total_score}");
                Ok(Self {
                    total_score,
                    high_score: 0,
                })
            }
            _ => Err(GameError::MalformedPersistedState),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|_| GameError::PersistenceUnavailable)
    }
}

/// Total and high score carried across rounds and sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionLedger<S> {
    store: S,
    total_score: Score,
    high_score: Score,
}

impl<S: ScoreStore> SessionLedger<S> {
    /// Creates a ledger and loads whatever the store holds.
    pub fn open(store: S) -> Self {
        let mut ledger = Self {
            store,
            total_score: 0,
            high_score: 0,
        };
        ledger.load();
        ledger
    }

    /// Reloads `(total_score, high_score)` from the store, falling back to zeros.
    pub fn load(&mut self) -> (Score, Score) {
        let record = match self.store.read() {
            Ok(Some(bytes)) => ScoreRecord::decode(&bytes).unwrap_or_else(|err| {
                log::warn!("Could not read saved scores: {err}");
                ScoreRecord::default()
            }),
            Ok(None) => ScoreRecord::default(),
            Err(err) => {
                log::warn!("Could not load saved scores: {err}");
                ScoreRecord::default()
            }
        };

        self.total_score = record.total_score;
        self.high_score = record.high_score;
        (self.total_score, self.high_score)
    }

    /// Sets both scores and writes them out.
    ///
    /// The high score only ever rises, a lower value is ignored. The in-memory values are updated
    /// even when writing fails.
    pub fn save(&mut self, total_score: Score, high_score: Score) -> Result<()> {
        self.total_score = total_score;
        self.high_score = self.high_score.max(high_score);
        self.persist()
    }

    /// Writes the current scores.
    pub fn persist(&mut self) -> Result<()> {
        let bytes = self.record().encode()?;
        self.store.write(&bytes)
    }

    /// Zeroes the total score. The high score is kept.
    pub fn reset(&mut self) {
        self.total_score = 0;
    }

    /// Adds a won round to the total and raises the high score if it was beaten.
    pub fn bank_round(&mut self, round_score: Score) {
        self.total_score = self.total_score.saturating_add(round_score);
        self.observe_high_score();
    }

    pub fn observe_high_score(&mut self) {
        self.high_score = self.high_score.max(self.total_score);
    }

    pub fn set_total_score(&mut self, total_score: Score) {
        self.total_score = total_score;
    }

    pub fn total_score(&self) -> Score {
        self.total_score
    }

    pub fn high_score(&self) -> Score {
        self.high_score
    }

    pub fn record(&self) -> ScoreRecord {
        ScoreRecord {
            total_score: self.total_score,
            high_score: self.high_score,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
