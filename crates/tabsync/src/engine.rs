//! The per-replica synchronization state machine.
//!
//! Each replica owns exactly one [`GameState`] and changes it only here.
//! Local intents are validated, applied, and then broadcast; remote
//! messages are applied behind nothing but the empty-cell guard. There is
//! no logical clock, so two replicas that both believe it is their turn can
//! each accept a different move before hearing from the other. That race is
//! inherent to the protocol and is logged, not repaired.

use crate::protocol::Message;
use crate::transport::Transport;
use crate::{PlayerId, Presenter, Rejection};
use serde_json::Value;
use std::str::FromStr;
use tabsync_tictactoe::{GameState, InvariantSet, MarkBalance, Outcome, Symbol, TurnParity};
use tracing::{debug, info, instrument, warn};

/// Where this replica stands, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Phase {
    /// This replica has not claimed a symbol.
    Lobby,
    /// Symbol claimed; the other symbol is to move.
    Waiting,
    /// Symbol claimed and it is to move.
    MyTurn,
    /// The board has a winner or is full.
    Terminal,
}

/// Owns one replica's state, its transport and its presenter.
pub struct SyncEngine<T, P> {
    identity: PlayerId,
    state: GameState,
    transport: T,
    presenter: P,
    announce_snapshot_on_join: bool,
}

impl<T, P> std::fmt::Debug for SyncEngine<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("identity", &self.identity)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T: Transport, P: Presenter> SyncEngine<T, P> {
    /// Creates an engine over a fresh game.
    #[instrument(skip(transport, presenter))]
    pub fn new(identity: PlayerId, transport: T, presenter: P) -> Self {
        info!("Replica started");
        Self {
            identity,
            state: GameState::new(),
            transport,
            presenter,
            announce_snapshot_on_join: false,
        }
    }

    /// Follow every local join with a full `state` broadcast.
    pub fn with_snapshot_on_join(mut self, enabled: bool) -> Self {
        self.announce_snapshot_on_join = enabled;
        self
    }

    /// This replica's identity.
    pub fn identity(&self) -> &PlayerId {
        &self.identity
    }

    /// Current local state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The presenter receiving callbacks.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The transport used for broadcasts.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Symbol this replica claimed, if any.
    pub fn local_symbol(&self) -> Option<Symbol> {
        self.state.symbol_of(self.identity.as_str())
    }

    /// Current phase. A finished board wins over every other phase.
    pub fn phase(&self) -> Phase {
        if self.state.outcome().is_terminal() {
            return Phase::Terminal;
        }
        match self.local_symbol() {
            None => Phase::Lobby,
            Some(symbol) if symbol == self.state.turn() => Phase::MyTurn,
            Some(_) => Phase::Waiting,
        }
    }

    /// Claims the symbol named by `symbol` (`"X"` or `"O"`).
    ///
    /// # Errors
    ///
    /// [`Rejection::InvalidSymbol`] for anything else; nothing is broadcast.
    #[instrument(skip(self), fields(identity = %self.identity))]
    pub fn join(&mut self, symbol: &str) -> Result<Symbol, Rejection> {
        match Symbol::from_str(symbol.trim()) {
            Ok(symbol) => {
                self.join_as(symbol);
                Ok(symbol)
            }
            Err(_) => Err(self.reject(Rejection::InvalidSymbol(symbol.to_string()))),
        }
    }

    /// Claims `symbol` and announces the claim.
    ///
    /// Nothing checks whether another replica already holds the symbol;
    /// concurrent claims for the same symbol all stand.
    #[instrument(skip(self), fields(identity = %self.identity))]
    pub fn join_as(&mut self, symbol: Symbol) {
        self.state.claim(self.identity.as_str(), symbol);
        info!(phase = %self.phase(), "Joined");
        self.presenter.on_state_changed(&self.state);
        self.presenter.on_status_message(&format!("You joined as {}", symbol));

        self.broadcast(Message::Join {
            identity: self.identity.to_string(),
            symbol,
        });
        if self.announce_snapshot_on_join {
            self.broadcast_snapshot();
        }
    }

    /// Places this replica's mark at `index` (0-8).
    ///
    /// # Errors
    ///
    /// Checked in order: [`Rejection::InvalidIndex`], [`Rejection::GameOver`],
    /// [`Rejection::NotJoined`], [`Rejection::NotYourTurn`],
    /// [`Rejection::CellOccupied`]. A finished board refuses every replica,
    /// joined or not. A rejected move changes nothing and is not broadcast.
    #[instrument(skip(self), fields(identity = %self.identity))]
    pub fn attempt_move(&mut self, index: usize) -> Result<Outcome, Rejection> {
        if index >= 9 {
            return Err(self.reject(Rejection::InvalidIndex(index)));
        }
        if self.state.outcome().is_terminal() {
            return Err(self.reject(Rejection::GameOver));
        }
        let Some(symbol) = self.local_symbol() else {
            return Err(self.reject(Rejection::NotJoined));
        };
        if self.state.turn() != symbol {
            return Err(self.reject(Rejection::NotYourTurn(self.state.turn())));
        }
        if !self.state.board().is_empty(index) {
            return Err(self.reject(Rejection::CellOccupied(index)));
        }

        let outcome = match self.state.place(index, symbol) {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.reject(e.into())),
        };
        info!(%symbol, index, ?outcome, "Move accepted");
        self.presenter.on_state_changed(&self.state);
        self.announce_progress();

        self.broadcast(Message::Move { index, symbol });
        Ok(outcome)
    }

    /// Sends the full local state so other replicas adopt it.
    #[instrument(skip(self), fields(identity = %self.identity))]
    pub fn broadcast_snapshot(&mut self) {
        self.broadcast(Message::Snapshot(self.state.clone()));
    }

    /// Applies a delivered value. Undecodable values are dropped.
    ///
    /// Returns whether the local state changed.
    #[instrument(skip(self, value), fields(identity = %self.identity))]
    pub fn receive(&mut self, value: Value) -> bool {
        match Message::decode(value) {
            Some(message) => self.apply(message),
            None => false,
        }
    }

    /// Applies a remote message.
    ///
    /// Returns whether the local state changed.
    #[instrument(skip(self, message), fields(identity = %self.identity, kind = message.kind()))]
    pub fn apply(&mut self, message: Message) -> bool {
        match message {
            Message::Join { identity, symbol } => {
                self.state.claim(&identity, symbol);
                let claimants = self.state.claimants(symbol).len();
                if claimants > 1 {
                    warn!(%symbol, claimants, "Symbol claimed by more than one identity");
                }
                self.presenter.on_state_changed(&self.state);
                self.presenter
                    .on_status_message(&format!("{} joined as {}", identity, symbol));
                true
            }
            Message::Move { index, symbol } => match self.state.place(index, symbol) {
                Ok(outcome) => {
                    debug!(%symbol, index, ?outcome, "Remote move applied");
                    self.check_invariants();
                    self.presenter.on_state_changed(&self.state);
                    self.announce_progress();
                    true
                }
                Err(e) => {
                    debug!(%symbol, index, reason = %e, "Remote move dropped");
                    false
                }
            },
            Message::Snapshot(state) => {
                self.state = state;
                debug!(outcome = ?self.state.outcome(), "Adopted remote snapshot");
                self.check_invariants();
                self.presenter.on_state_changed(&self.state);
                self.announce_progress();
                true
            }
        }
    }

    fn announce_progress(&mut self) {
        let text = match self.state.outcome() {
            Outcome::Win { symbol, .. } => format!("Winner: {}!", symbol),
            Outcome::Draw => "Draw!".to_string(),
            Outcome::InProgress => format!("Current turn: {}", self.state.turn()),
        };
        self.presenter.on_status_message(&text);
    }

    fn reject(&mut self, rejection: Rejection) -> Rejection {
        debug!(%rejection, "Intent rejected");
        self.presenter.on_status_message(&rejection.to_string());
        rejection
    }

    fn check_invariants(&self) {
        if let Err(violations) = <(MarkBalance, TurnParity)>::check_all(&self.state) {
            for violation in violations {
                warn!(%violation, "Replica state diverged from sequential play");
            }
        }
    }

    fn broadcast(&mut self, message: Message) {
        let kind = message.kind();
        let result = message
            .encode()
            .map_err(crate::TransportError::from)
            .and_then(|value| self.transport.post(value));
        match result {
            Ok(()) => debug!(kind, "Broadcast"),
            Err(e) => warn!(kind, error = %e, "Broadcast failed, peers will not see this change"),
        }
    }
}
