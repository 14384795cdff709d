use core::fmt;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Price of skipping a level from the menu.
pub const LEVEL_SKIP_COST: Score = 100;

const BASE_DECREASE_CHANCE: f64 = 0.10;
const DECREASE_CHANCE_PER_LEVEL: f64 = 0.05;
const MAX_DECREASE_CHANCE: f64 = 0.9;

// thresholds on the second draw, the rest resets to level 1
const DECREASE_BY_1_BELOW: f64 = 0.70;
const DECREASE_BY_2_BELOW: f64 = 0.90;

/// How the level moved after a lost round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelChange {
    NoChange,
    DecreasedBy1,
    DecreasedBy2,
    ResetToLevel1,
}

impl LevelChange {
    pub fn apply(self, level: Level) -> Level {
        use LevelChange::*;
        match self {
            NoChange => level.max(1),
            DecreasedBy1 => level.saturating_sub(1).max(1),
            DecreasedBy2 => level.saturating_sub(2).max(1),
            ResetToLevel1 => 1,
        }
    }

    /// Decides the change from a gate draw and a lazily taken severity draw, both uniform in `[0, 1)`.
    pub fn from_draws(level: Level, gate: f64, severity: impl FnOnce() -> f64) -> Self {
        if gate >= decrease_chance(level) {
            return Self::NoChange;
        }

        let severity = severity();
        if severity < DECREASE_BY_1_BELOW {
            Self::DecreasedBy1
        } else if severity < DECREASE_BY_2_BELOW {
            Self::DecreasedBy2
        } else {
            Self::ResetToLevel1
        }
    }
}

impl fmt::Display for LevelChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use LevelChange::*;
        f.write_str(match self {
            NoChange => "no change",
            DecreasedBy1 => "decreased by 1",
            DecreasedBy2 => "decreased by 2",
            ResetToLevel1 => "reset to Level 1",
        })
    }
}

/// Probability that losing at `level` costs at least one level.
pub fn decrease_chance(level: Level) -> f64 {
    let levels_above_first = f64::from(level.saturating_sub(1));
    (BASE_DECREASE_CHANCE + DECREASE_CHANCE_PER_LEVEL * levels_above_first).min(MAX_DECREASE_CHANCE)
}

/// Level to play after losing at `level`.
///
/// Takes one uniform draw to decide whether the level drops at all and, only if it does, a second
/// independent draw to decide by how much.
pub fn resolve_loss<R: Rng + ?Sized>(level: Level, rng: &mut R) -> (Level, LevelChange) {
    let gate: f64 = rng.random();
    let change = LevelChange::from_draws(level, gate, || rng.random());
    let new_level = change.apply(level);
    log::debug!("lost at level {level}, {change} -> {new_level}");
    (new_level, change)
}

pub fn resolve_win(level: Level) -> Level {
    level.saturating_add(1)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpendOutcome {
    Accepted {
        level: Level,
        total_score: Score,
    },
    Rejected {
        level: Level,
        total_score: Score,
        reason: Rejection,
    },
}

impl SpendOutcome {
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub const fn level(&self) -> Level {
        match *self {
            Self::Accepted { level, .. } | Self::Rejected { level, .. } => level,
        }
    }

    pub const fn total_score(&self) -> Score {
        match *self {
            Self::Accepted { total_score, .. } | Self::Rejected { total_score, .. } => total_score,
        }
    }
}

/// Trades [`LEVEL_SKIP_COST`] points for one level.
pub fn spend_points(level: Level, total_score: Score) -> SpendOutcome {
    match total_score.checked_sub(LEVEL_SKIP_COST) {
        Some(remaining) => SpendOutcome::Accepted {
            level: level.saturating_add(1),
            total_score: remaining,
        },
        None => SpendOutcome::Rejected {
            level,
            total_score,
            reason: Rejection::InsufficientFunds,
        },
    }
}
