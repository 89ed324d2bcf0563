//! Wire protocol between replicas.
//!
//! Every message is a structured value `{"type": ..., "payload": ...}`:
//!
//! | type    | payload                               |
//! |---------|---------------------------------------|
//! | `join`  | `{"identity": "...", "symbol": "X"}`  |
//! | `move`  | `{"index": 4, "symbol": "X"}`         |
//! | `state` | `{"board": [...], "currentTurn": "O", "players": {...}}` |
//!
//! The channel may be shared with unrelated listeners, so anything that
//! does not decode into [`Message`] is dropped rather than treated as an
//! error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabsync_tictactoe::{GameState, Symbol};
use tracing::{debug, instrument};

/// A message exchanged between replicas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum Message {
    /// Sender claims a symbol.
    Join {
        /// Sender's identity. Older tabs send it as `id`.
        #[serde(alias = "id")]
        identity: String,
        /// Claimed symbol.
        symbol: Symbol,
    },

    /// Sender placed a mark.
    Move {
        /// Cell index; values outside 0-8 are dropped on receipt.
        index: usize,
        /// Mark placed.
        symbol: Symbol,
    },

    /// Sender's complete state; overwrites the receiver's.
    #[serde(rename = "state")]
    Snapshot(GameState),
}

impl Message {
    /// Short name of the message type, as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Join { .. } => "join",
            Message::Move { .. } => "move",
            Message::Snapshot(_) => "state",
        }
    }

    /// Encodes the message as a structured value.
    pub fn encode(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Decodes a delivered value.
    ///
    /// Returns `None` for unknown types, missing fields and unknown symbols.
    #[instrument(skip(value))]
    pub fn decode(value: Value) -> Option<Self> {
        match serde_json::from_value(value) {
            Ok(message) => Some(message),
            Err(e) => {
                debug!(error = %e, "Ignoring undecodable message");
                None
            }
        }
    }
}
