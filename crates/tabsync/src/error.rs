//! Error types for the replication layer.

use derive_more::{Display, Error};
use tabsync_tictactoe::{PlaceError, Symbol};
use tracing::instrument;

/// A local intent the engine declined.
///
/// Rejections are never fatal and never transient: repeating the same
/// intent without a state change yields the same rejection. Nothing that
/// was rejected is ever broadcast. The display text is what the player
/// sees.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Rejection {
    /// This replica has not claimed a symbol yet.
    #[display("Join the game first!")]
    NotJoined,

    /// Cell index outside 0-8.
    #[display("Cell {} is not on the board", _0)]
    InvalidIndex(usize),

    /// Symbol other than X or O.
    #[display("Unknown symbol '{}', join as X or O", _0)]
    InvalidSymbol(String),

    /// Target cell already holds a mark.
    #[display("Cell {} is already taken", _0)]
    CellOccupied(usize),

    /// The board expects the other symbol to move.
    #[display("Not your turn, waiting for {}", _0)]
    NotYourTurn(Symbol),

    /// The board already has a winner or is full.
    #[display("Game is over")]
    GameOver,
}

impl std::error::Error for Rejection {}

impl From<PlaceError> for Rejection {
    fn from(err: PlaceError) -> Self {
        match err {
            PlaceError::OutOfBounds(index) => Rejection::InvalidIndex(index),
            PlaceError::Occupied(index) => Rejection::CellOccupied(index),
            PlaceError::GameOver => Rejection::GameOver,
        }
    }
}

/// Transport failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Transport error: {} at {}:{}", message, file, line)]
pub struct TransportError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TransportError {
    /// Creates a new transport error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<serde_json::Error> for TransportError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Failed to encode message: {}", err))
    }
}

/// The replica behind a [`ReplicaHandle`](crate::ReplicaHandle) has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Replica is no longer running")]
pub struct ReplicaClosed;
