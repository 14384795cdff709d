use std::fmt::Write;

use ndarray::Array2;
use voltorb_core::{BOARD_SIZE, Board, CardValue, CellFace, LineHint, RoundState};

const CELL_WIDTH: usize = 4;

fn face_label(face: CellFace) -> &'static str {
    match face {
        CellFace::Hidden => ".",
        CellFace::Marked => "!",
        CellFace::Revealed(CardValue::Mine) => "V",
        CellFace::Revealed(CardValue::One) => "1",
        CellFace::Revealed(CardValue::Two) => "2",
        CellFace::Revealed(CardValue::Three) => "3",
    }
}

fn hint_label(hint: &LineHint) -> String {
    format!("{}/{}", hint.points, hint.mines)
}

fn render_faces(faces: &Array2<CellFace>, board: &Board) -> String {
    let mut out = String::new();

    out.push_str("    ");
    for col in 1..=BOARD_SIZE {
        let _ = write!(out, "{col:>CELL_WIDTH$}");
    }
    out.push('\n');

    for (row, (cells, hint)) in faces.rows().into_iter().zip(board.row_hints()).enumerate() {
        let _ = write!(out, "{:>4}", row + 1);
        for &face in cells {
            let _ = write!(out, "{:>CELL_WIDTH$}", face_label(face));
        }
        let _ = writeln!(out, "   {}", hint_label(hint));
    }

    out.push_str("    ");
    for hint in board.col_hints() {
        let _ = write!(out, "{:>CELL_WIDTH$}", hint_label(hint));
    }
    out.push('\n');
    out
}

/// Grid with hints. Once the round is over every card is shown.
pub fn board(board: &Board) -> String {
    let faces = if board.is_finished() {
        board.reveal_all()
    } else {
        board.faces()
    };
    render_faces(&faces, board)
}

pub fn status(board: &Board, high_score: u64) -> String {
    let mut out = format!(
        "Level: {}  Current points: {}  Total score: {}  High score: {}",
        board.level(),
        board.round_score(),
        board.total_score(),
        high_score,
    );
    match board.state() {
        RoundState::InProgress => {}
        RoundState::Won => out.push_str("\nLevel cleared! Press enter to continue."),
        RoundState::Lost => out.push_str("\nGame over! Press enter to continue."),
    }
    out
}
