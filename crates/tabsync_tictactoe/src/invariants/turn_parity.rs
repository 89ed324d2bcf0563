//! Turn parity: the symbol to move follows from the mark counts.

use super::Invariant;
use crate::{GameState, Symbol};

/// Invariant: while the game is in progress, X moves exactly when both
/// symbols have the same number of marks.
pub struct TurnParity;

impl Invariant<GameState> for TurnParity {
    fn holds(state: &GameState) -> bool {
        if state.outcome().is_terminal() {
            return true;
        }
        let balanced = state.board().count(Symbol::X) == state.board().count(Symbol::O);
        (state.turn() == Symbol::X) == balanced
    }

    fn description() -> &'static str {
        "X is to move exactly when X and O have the same number of marks"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InvariantSet, MarkBalance};

    #[test]
    fn test_alternating_play_holds() {
        let mut state = GameState::new();
        for (index, symbol) in [(4, Symbol::X), (0, Symbol::O), (8, Symbol::X)] {
            state.place(index, symbol).unwrap();
            assert!(TurnParity::holds(&state));
        }
    }

    #[test]
    fn test_raced_moves_are_reported() {
        // Two tabs both answered X's opening move as O before syncing.
        let mut state = GameState::new();
        state.place(0, Symbol::X).unwrap();
        state.place(4, Symbol::O).unwrap();
        state.place(5, Symbol::O).unwrap();

        let violations = <(MarkBalance, TurnParity)>::check_all(&state).unwrap_err();
        assert_eq!(violations.len(), 2);
    }
}
