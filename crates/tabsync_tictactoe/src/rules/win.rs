//! Win detection.

use super::draw::is_full;
use crate::{Board, Cell, Outcome};
use tracing::instrument;

/// Three cell indices that form a line.
pub type Line = [usize; 3];

/// The eight winning lines in reporting priority order.
pub const LINES: [Line; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Evaluates a board.
///
/// The first complete line in [`LINES`] order wins. A full board with no
/// complete line is a draw; anything else is still in progress.
#[instrument]
pub fn evaluate(board: &Board) -> Outcome {
    for line in LINES {
        let [a, b, c] = line;
        if let Some(Cell::Mark(symbol)) = board.get(a)
            && board.get(b) == Some(Cell::Mark(symbol))
            && board.get(c) == Some(Cell::Mark(symbol))
        {
            return Outcome::Win { symbol, line };
        }
    }

    if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    fn board(marks: &[(usize, Symbol)]) -> Board {
        let mut board = Board::new();
        for &(index, symbol) in marks {
            board.mark(index, symbol);
        }
        board
    }

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(evaluate(&Board::new()), Outcome::InProgress);
    }

    #[test]
    fn test_winner_top_row() {
        let board = board(&[
            (0, Symbol::X),
            (1, Symbol::X),
            (2, Symbol::X),
            (3, Symbol::O),
            (4, Symbol::O),
        ]);
        assert_eq!(
            evaluate(&board),
            Outcome::Win {
                symbol: Symbol::X,
                line: [0, 1, 2]
            }
        );
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = board(&[(2, Symbol::O), (4, Symbol::O), (6, Symbol::O)]);
        assert_eq!(
            evaluate(&board),
            Outcome::Win {
                symbol: Symbol::O,
                line: [2, 4, 6]
            }
        );
    }

    #[test]
    fn test_first_line_in_priority_order_is_cited() {
        // Row 0 and column 0 both complete; the row is listed first.
        let board = board(&[
            (0, Symbol::X),
            (1, Symbol::X),
            (2, Symbol::X),
            (3, Symbol::X),
            (6, Symbol::X),
        ]);
        assert_eq!(
            evaluate(&board),
            Outcome::Win {
                symbol: Symbol::X,
                line: [0, 1, 2]
            }
        );
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // X O X / O X X / O X O
        let board = board(&[
            (0, Symbol::X),
            (1, Symbol::O),
            (2, Symbol::X),
            (3, Symbol::O),
            (4, Symbol::X),
            (5, Symbol::X),
            (6, Symbol::O),
            (7, Symbol::X),
            (8, Symbol::O),
        ]);
        assert_eq!(evaluate(&board), Outcome::Draw);
    }

    #[test]
    fn test_win_on_last_cell_is_not_draw() {
        // X O O / O X X / X O X: full, and the main diagonal is complete.
        let board = board(&[
            (0, Symbol::X),
            (1, Symbol::O),
            (2, Symbol::O),
            (3, Symbol::O),
            (4, Symbol::X),
            (5, Symbol::X),
            (6, Symbol::X),
            (7, Symbol::O),
            (8, Symbol::X),
        ]);
        assert_eq!(
            evaluate(&board),
            Outcome::Win {
                symbol: Symbol::X,
                line: [0, 4, 8]
            }
        );
    }

    #[test]
    fn test_incomplete_line_in_progress() {
        let board = board(&[(0, Symbol::X), (1, Symbol::X)]);
        assert_eq!(evaluate(&board), Outcome::InProgress);
    }
}
