//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board). Nothing here mutates
//! state, so a replica can evaluate any board it receives as often as it
//! likes.

mod draw;
mod win;

pub use draw::is_full;
pub use win::{LINES, Line, evaluate};
