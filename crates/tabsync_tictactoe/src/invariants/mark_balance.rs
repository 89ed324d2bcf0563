//! Mark balance: X never trails O and never leads by more than one.

use super::Invariant;
use crate::{GameState, Symbol};

/// Invariant: the board holds as many X marks as O marks, or one more.
pub struct MarkBalance;

impl Invariant<GameState> for MarkBalance {
    fn holds(state: &GameState) -> bool {
        let x = state.board().count(Symbol::X);
        let o = state.board().count(Symbol::O);
        x == o || x == o + 1
    }

    fn description() -> &'static str {
        "X has as many marks as O, or exactly one more"
    }
}
