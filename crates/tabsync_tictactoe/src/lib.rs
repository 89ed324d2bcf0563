//! Pure tic-tac-toe game logic for replicated play.
//!
//! Everything in this crate is deterministic and free of I/O. A replica owns
//! one [`GameState`] and mutates it through [`GameState::claim`] and
//! [`GameState::place`]; the outcome is always derived from the board by
//! [`evaluate`].
//!
//! # Example
//!
//! ```
//! use tabsync_tictactoe::{GameState, Outcome, Symbol};
//!
//! let mut state = GameState::new();
//! state.claim("Player-1", Symbol::X);
//! state.place(4, Symbol::X).unwrap();
//!
//! assert_eq!(state.turn(), Symbol::O);
//! assert_eq!(state.outcome(), Outcome::InProgress);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod invariants;
mod position;
mod rules;
mod state;
mod types;

pub use invariants::{Invariant, InvariantSet, InvariantViolation, MarkBalance, TurnParity};
pub use position::Position;
pub use rules::{LINES, Line, evaluate, is_full};
pub use state::{GameState, PlaceError};
pub use types::{Board, Cell, Outcome, Symbol};
