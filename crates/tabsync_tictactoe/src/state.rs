//! The replicated game state.

use crate::rules::evaluate;
use crate::{Board, Outcome, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// One replica's copy of the game.
///
/// Serializes with the field names the browser tabs exchange in a `state`
/// message: `board`, `currentTurn` and `players`. The outcome is never
/// stored; [`GameState::outcome`] derives it from the board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    #[serde(rename = "currentTurn")]
    turn: Symbol,
    #[serde(rename = "players", default)]
    roster: BTreeMap<String, Symbol>,
}

/// Why [`GameState::place`] refused a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PlaceError {
    /// Index is not in `0..9`.
    #[display("Position {} is outside the board", _0)]
    OutOfBounds(usize),

    /// Cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    Occupied(usize),

    /// The board already has a winner or is full.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for PlaceError {}

impl GameState {
    /// Creates a fresh game: empty board, X to move, nobody joined.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a state from its parts, e.g. a snapshot built by hand.
    pub fn from_parts(board: Board, turn: Symbol, roster: BTreeMap<String, Symbol>) -> Self {
        Self {
            board,
            turn,
            roster,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Symbol whose move is currently accepted.
    pub fn turn(&self) -> Symbol {
        self.turn
    }

    /// Identity to symbol claims.
    pub fn roster(&self) -> &BTreeMap<String, Symbol> {
        &self.roster
    }

    /// Outcome derived from the current board.
    pub fn outcome(&self) -> Outcome {
        evaluate(&self.board)
    }

    /// Symbol claimed by `identity`, if any.
    pub fn symbol_of(&self, identity: &str) -> Option<Symbol> {
        self.roster.get(identity).copied()
    }

    /// Every identity that has claimed `symbol`.
    ///
    /// Claims are never arbitrated, so more than one identity can hold the
    /// same symbol.
    pub fn claimants(&self, symbol: Symbol) -> Vec<&str> {
        self.roster
            .iter()
            .filter(|(_, claimed)| **claimed == symbol)
            .map(|(identity, _)| identity.as_str())
            .collect()
    }

    /// Records that `identity` plays `symbol`.
    ///
    /// Purely additive: a later claim by the same identity replaces its
    /// earlier one, and no claim by another identity is ever removed.
    #[instrument(skip(self))]
    pub fn claim(&mut self, identity: &str, symbol: Symbol) {
        if let Some(previous) = self.roster.insert(identity.to_string(), symbol)
            && previous != symbol
        {
            debug!(?previous, "Identity switched symbol");
        }
    }

    /// Marks `index` for `symbol` and hands the turn to the opponent.
    ///
    /// This is the emptiness guard shared by local and remote moves. It does
    /// not check that `symbol` matches [`GameState::turn`]; callers that must
    /// honor turn order check that first.
    ///
    /// # Errors
    ///
    /// Refuses out-of-range indices, finished games and marked cells, leaving
    /// the state untouched.
    #[instrument(skip(self))]
    pub fn place(&mut self, index: usize, symbol: Symbol) -> Result<Outcome, PlaceError> {
        if index >= 9 {
            return Err(PlaceError::OutOfBounds(index));
        }
        if self.outcome().is_terminal() {
            return Err(PlaceError::GameOver);
        }
        if !self.board.mark(index, symbol) {
            return Err(PlaceError::Occupied(index));
        }
        self.turn = symbol.opponent();

        let outcome = self.outcome();
        debug!(?outcome, turn = %self.turn, "Mark placed");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    #[test]
    fn test_new_state() {
        let state = GameState::new();
        assert_eq!(state.turn(), Symbol::X);
        assert!(state.roster().is_empty());
        assert_eq!(state.outcome(), Outcome::InProgress);
    }

    #[test]
    fn test_place_flips_turn_to_opponent_of_placer() {
        let mut state = GameState::new();
        state.place(4, Symbol::X).unwrap();
        assert_eq!(state.turn(), Symbol::O);
        assert_eq!(state.board().get(4), Some(Cell::Mark(Symbol::X)));
    }

    #[test]
    fn test_place_on_marked_cell_is_noop() {
        let mut state = GameState::new();
        state.place(4, Symbol::X).unwrap();
        let before = state.clone();

        assert_eq!(state.place(4, Symbol::O), Err(PlaceError::Occupied(4)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_place_after_win_is_refused() {
        let mut state = GameState::new();
        for (index, symbol) in [(0, Symbol::X), (3, Symbol::O), (1, Symbol::X), (4, Symbol::O)] {
            state.place(index, symbol).unwrap();
        }
        let outcome = state.place(2, Symbol::X).unwrap();
        assert_eq!(outcome.winner(), Some(Symbol::X));

        assert_eq!(state.place(5, Symbol::O), Err(PlaceError::GameOver));
        assert!(state.board().is_empty(5));
    }

    #[test]
    fn test_double_claim_keeps_both_entries() {
        let mut state = GameState::new();
        state.claim("p1", Symbol::X);
        state.claim("p2", Symbol::X);

        assert_eq!(state.roster().len(), 2);
        assert_eq!(state.claimants(Symbol::X), vec!["p1", "p2"]);
    }

    #[test]
    fn test_snapshot_field_names() {
        let mut state = GameState::new();
        state.claim("Player-1", Symbol::X);
        state.place(0, Symbol::X).unwrap();

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["currentTurn"], "O");
        assert_eq!(value["players"]["Player-1"], "X");
        assert_eq!(value["board"][0], "X");
        assert!(value["board"][1].is_null());
    }
}
