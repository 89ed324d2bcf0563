//! Presentation seam.
//!
//! Rendering lives outside the engine. The engine reports through a
//! [`Presenter`]; whatever draws the board implements it.

use tabsync_tictactoe::GameState;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Receives render callbacks from a [`SyncEngine`](crate::SyncEngine).
pub trait Presenter: Send {
    /// Called after every accepted local or remote mutation.
    fn on_state_changed(&mut self, state: &GameState);

    /// Called with join confirmations, turn prompts, results and rejection
    /// reasons.
    fn on_status_message(&mut self, text: &str);
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn on_state_changed(&mut self, state: &GameState) {
        (**self).on_state_changed(state);
    }

    fn on_status_message(&mut self, text: &str) {
        (**self).on_status_message(text);
    }
}

/// Presenter that only logs.
#[derive(Debug, Clone)]
pub struct TracingPresenter {
    replica: String,
}

impl TracingPresenter {
    /// Creates a presenter that tags its log lines with `replica`.
    pub fn new(replica: impl Into<String>) -> Self {
        Self {
            replica: replica.into(),
        }
    }
}

impl Presenter for TracingPresenter {
    fn on_state_changed(&mut self, state: &GameState) {
        debug!(
            replica = %self.replica,
            turn = %state.turn(),
            outcome = ?state.outcome(),
            "State changed"
        );
    }

    fn on_status_message(&mut self, text: &str) {
        info!(replica = %self.replica, "{}", text);
    }
}

/// Presenter that prints the board and status lines to stdout.
#[derive(Debug, Clone)]
pub struct TerminalPresenter {
    label: String,
}

impl TerminalPresenter {
    /// Creates a presenter that prefixes its output with `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Presenter for TerminalPresenter {
    fn on_state_changed(&mut self, state: &GameState) {
        println!("[{}]\n{}\n", self.label, state.board().display());
    }

    fn on_status_message(&mut self, text: &str) {
        println!("[{}] {}", self.label, text);
    }
}

/// Event forwarded by a [`ChannelPresenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A replica's state changed.
    StateChanged {
        /// Replica label.
        replica: String,
        /// The state after the change.
        state: GameState,
    },
    /// A replica produced a status line.
    Status {
        /// Replica label.
        replica: String,
        /// Status text.
        text: String,
    },
}

/// Presenter that forwards every callback over a channel, so a UI task can
/// render replicas running elsewhere.
#[derive(Debug, Clone)]
pub struct ChannelPresenter {
    replica: String,
    event_tx: mpsc::UnboundedSender<GameEvent>,
}

impl ChannelPresenter {
    /// Creates a presenter forwarding to `event_tx`, tagged with `replica`.
    pub fn new(replica: impl Into<String>, event_tx: mpsc::UnboundedSender<GameEvent>) -> Self {
        Self {
            replica: replica.into(),
            event_tx,
        }
    }

    fn send(&self, event: GameEvent) {
        if self.event_tx.send(event).is_err() {
            debug!(replica = %self.replica, "Event receiver dropped");
        }
    }
}

impl Presenter for ChannelPresenter {
    fn on_state_changed(&mut self, state: &GameState) {
        self.send(GameEvent::StateChanged {
            replica: self.replica.clone(),
            state: state.clone(),
        });
    }

    fn on_status_message(&mut self, text: &str) {
        self.send(GameEvent::Status {
            replica: self.replica.clone(),
            text: text.to_string(),
        });
    }
}
