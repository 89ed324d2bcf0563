//! Serverless tic-tac-toe between tabs sharing a broadcast channel.
//!
//! Each tab (a *replica*) owns its own [`GameState`] and keeps it in step
//! with the others purely by exchanging messages; there is no server and no
//! lock.
//!
//! # Architecture
//!
//! - **Protocol**: [`Message`], the closed set of `join`, `move` and `state`
//!   messages.
//! - **Transport**: [`Transport`], injected into the engine; [`LocalBus`]
//!   is an in-process broadcast channel, [`Outbox`] a manual one.
//! - **Engine**: [`SyncEngine`], the per-replica state machine.
//! - **Presenter**: [`Presenter`], the render callbacks a UI implements.
//! - **Replica**: [`Replica`], an async loop feeding intents and deliveries
//!   to one engine, one at a time.
//!
//! # Example
//!
//! ```
//! use tabsync::{LocalBus, PlayerId, SyncEngine, TracingPresenter};
//!
//! let bus = LocalBus::new("gameChannel", 16);
//! let (a_out, _a_in) = bus.connect();
//! let (b_out, mut b_in) = bus.connect();
//!
//! let mut a = SyncEngine::new(PlayerId::generate("Player"), a_out, TracingPresenter::new("a"));
//! let mut b = SyncEngine::new(PlayerId::generate("Player"), b_out, TracingPresenter::new("b"));
//!
//! a.join("X").unwrap();
//! a.attempt_move(4).unwrap();
//! while let Some(value) = b_in.try_recv() {
//!     b.receive(value);
//! }
//! assert_eq!(b.state(), a.state());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod engine;
mod error;
mod identity;
mod presenter;
mod protocol;
mod replica;
mod transport;

pub use config::{CHANNEL_ENV, ConfigError, ReplicaConfig};
pub use engine::{Phase, SyncEngine};
pub use error::{Rejection, ReplicaClosed, TransportError};
pub use identity::PlayerId;
pub use presenter::{ChannelPresenter, GameEvent, Presenter, TerminalPresenter, TracingPresenter};
pub use protocol::Message;
pub use replica::{Intent, Replica, ReplicaHandle};
pub use transport::{BusEndpoint, LocalBus, Outbox, Subscription, Transport};

pub use tabsync_tictactoe::{Board, Cell, GameState, Outcome, Position, Symbol, evaluate};
