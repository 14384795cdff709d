use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::*;

/// Clue shown beside a row or below a column.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineHint {
    /// Sum of every non-mine card in the line.
    pub points: u8,
    /// Number of mines in the line.
    pub mines: u8,
}

impl LineHint {
    fn from_line(line: ArrayView1<'_, CardValue>) -> Self {
        line.iter().fold(Self::default(), |hint, &card| {
            if card.is_mine() {
                Self {
                    mines: hint.mines + 1,
                    ..hint
                }
            } else {
                Self {
                    points: hint.points + card.points(),
                    ..hint
                }
            }
        })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hints {
    pub rows: [LineHint; BOARD_SIZE as usize],
    pub cols: [LineHint; BOARD_SIZE as usize],
}

/// Row and column clues of the full hidden layout.
pub fn compute_hints(layout: &CardLayout) -> Hints {
    let cards = layout.cards();
    let mut hints = Hints::default();

    for (hint, row) in hints.rows.iter_mut().zip(cards.rows()) {
        *hint = LineHint::from_line(row);
    }
    for (hint, col) in hints.cols.iter_mut().zip(cards.columns()) {
        *hint = LineHint::from_line(col);
    }

    hints
}
