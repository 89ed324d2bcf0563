//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Mark a player places on the board.
///
/// Serialized as `"X"` or `"O"`. Parsing, from user input or from the wire,
/// also accepts the lowercase spelling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Symbol {
    /// Symbol X (moves first).
    #[default]
    #[serde(alias = "x")]
    X,
    /// Symbol O (moves second).
    #[serde(alias = "o")]
    O,
}

impl Symbol {
    /// Returns the other symbol.
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

/// A cell on the board.
///
/// On the wire an empty cell is `null` and a marked cell is `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Symbol>", into = "Option<Symbol>")]
pub enum Cell {
    /// Nobody has marked this cell.
    #[default]
    Empty,
    /// Cell marked by a symbol.
    Mark(Symbol),
}

impl Cell {
    /// Returns the symbol in this cell, if any.
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Cell::Empty => None,
            Cell::Mark(symbol) => Some(symbol),
        }
    }
}

impl From<Option<Symbol>> for Cell {
    fn from(value: Option<Symbol>) -> Self {
        value.map_or(Cell::Empty, Cell::Mark)
    }
}

impl From<Cell> for Option<Symbol> {
    fn from(cell: Cell) -> Self {
        cell.symbol()
    }
}

/// 3x3 board, cells in row-major order (0-8).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from nine cells.
    pub fn from_cells(cells: [Cell; 9]) -> Self {
        Self { cells }
    }

    /// Gets the cell at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks whether the cell at `index` exists and is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Marks an empty cell.
    ///
    /// Returns `false` without touching the board when the index is out of
    /// range or the cell is already marked. A marked cell never reverts.
    #[instrument(skip(self))]
    pub fn mark(&mut self, index: usize, symbol: Symbol) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) if *cell == Cell::Empty => {
                *cell = Cell::Mark(symbol);
                true
            }
            _ => false,
        }
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Counts the cells marked by `symbol`.
    pub fn count(&self, symbol: Symbol) -> usize {
        self.cells
            .iter()
            .filter(|cell| **cell == Cell::Mark(symbol))
            .count()
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Empty cells show their index so a player can type it back.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                match self.cells[index] {
                    Cell::Empty => result.push_str(&index.to_string()),
                    Cell::Mark(symbol) => result.push_str(&symbol.to_string()),
                }
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// No line is complete and at least one cell is empty.
    InProgress,
    /// `symbol` completed `line`.
    Win {
        /// The winning symbol.
        symbol: Symbol,
        /// Indices of the completed line.
        line: [usize; 3],
    },
    /// Every cell is marked and no line is complete.
    Draw,
}

impl Outcome {
    /// Whether the game has ended.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// Returns the winning symbol, if any.
    pub fn winner(self) -> Option<Symbol> {
        match self {
            Outcome::Win { symbol, .. } => Some(symbol),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_symbol_parses_case_insensitively() {
        assert_eq!(Symbol::from_str("x").unwrap(), Symbol::X);
        assert_eq!(Symbol::from_str("O").unwrap(), Symbol::O);
        assert!(Symbol::from_str("Z").is_err());
    }

    #[test]
    fn test_marked_cell_never_reverts() {
        let mut board = Board::new();
        assert!(board.mark(4, Symbol::X));
        assert!(!board.mark(4, Symbol::O));
        assert_eq!(board.get(4), Some(Cell::Mark(Symbol::X)));
    }

    #[test]
    fn test_mark_out_of_range_is_refused() {
        let mut board = Board::new();
        assert!(!board.mark(9, Symbol::X));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_cells_serialize_as_null_or_symbol() {
        let mut board = Board::new();
        board.mark(0, Symbol::X);
        board.mark(8, Symbol::O);
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"["X",null,null,null,null,null,null,null,"O"]"#);
    }

    #[test]
    fn test_display_shows_indices_for_empty_cells() {
        let mut board = Board::new();
        board.mark(4, Symbol::X);
        assert_eq!(board.display(), "0|1|2\n-+-+-\n3|X|5\n-+-+-\n6|7|8");
    }
}
