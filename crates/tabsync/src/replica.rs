//! Event loop driving one replica.

use crate::transport::{BusEndpoint, LocalBus, Subscription};
use crate::{PlayerId, Presenter, ReplicaClosed, ReplicaConfig, SyncEngine};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// A user intent for a running replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Claim a symbol, given as typed by the user.
    Join(String),
    /// Place a mark at a cell index.
    Move(usize),
    /// Broadcast the full local state.
    Snapshot,
    /// Stop the event loop.
    Shutdown,
}

/// Cloneable sender of intents to one replica.
#[derive(Debug, Clone)]
pub struct ReplicaHandle {
    identity: PlayerId,
    intent_tx: mpsc::UnboundedSender<Intent>,
}

impl ReplicaHandle {
    /// Identity of the replica behind this handle.
    pub fn identity(&self) -> &PlayerId {
        &self.identity
    }

    /// Queues an intent.
    ///
    /// # Errors
    ///
    /// [`ReplicaClosed`] once the event loop has stopped.
    pub fn send(&self, intent: Intent) -> Result<(), ReplicaClosed> {
        self.intent_tx.send(intent).map_err(|_| ReplicaClosed)
    }

    /// Queues a join.
    pub fn join(&self, symbol: impl Into<String>) -> Result<(), ReplicaClosed> {
        self.send(Intent::Join(symbol.into()))
    }

    /// Queues a move.
    pub fn attempt_move(&self, index: usize) -> Result<(), ReplicaClosed> {
        self.send(Intent::Move(index))
    }

    /// Queues a snapshot broadcast.
    pub fn broadcast_snapshot(&self) -> Result<(), ReplicaClosed> {
        self.send(Intent::Snapshot)
    }

    /// Asks the event loop to stop.
    pub fn shutdown(&self) -> Result<(), ReplicaClosed> {
        self.send(Intent::Shutdown)
    }
}

/// One replica: an engine on a bus endpoint plus its intent queue.
///
/// [`Replica::run`] processes one event at a time, local intent or bus
/// delivery, so an intent's local application and its broadcast are never
/// interleaved with anything else.
#[derive(Debug)]
pub struct Replica<P> {
    engine: SyncEngine<BusEndpoint, P>,
    subscription: Subscription,
    intent_rx: mpsc::UnboundedReceiver<Intent>,
}

impl<P: Presenter> Replica<P> {
    /// Connects a new replica with a freshly generated identity.
    #[instrument(skip(bus, config, presenter), fields(channel = bus.name()))]
    pub fn connect(bus: &LocalBus, config: &ReplicaConfig, presenter: P) -> (Self, ReplicaHandle) {
        let identity = PlayerId::generate(config.identity_prefix());
        let (endpoint, subscription) = bus.connect();
        let engine = SyncEngine::new(identity.clone(), endpoint, presenter)
            .with_snapshot_on_join(*config.announce_snapshot_on_join());
        let (intent_tx, intent_rx) = mpsc::unbounded_channel();

        let replica = Self {
            engine,
            subscription,
            intent_rx,
        };
        let handle = ReplicaHandle {
            identity,
            intent_tx,
        };
        (replica, handle)
    }

    /// The engine this replica drives.
    pub fn engine(&self) -> &SyncEngine<BusEndpoint, P> {
        &self.engine
    }

    /// Runs until shutdown, until every handle is dropped, or until the bus
    /// closes. Returns the engine so callers can inspect the final state.
    #[instrument(skip(self), fields(identity = %self.engine.identity()))]
    pub async fn run(mut self) -> SyncEngine<BusEndpoint, P> {
        info!("Replica event loop started");
        loop {
            tokio::select! {
                intent = self.intent_rx.recv() => match intent {
                    Some(Intent::Shutdown) | None => break,
                    Some(intent) => self.handle_intent(intent),
                },
                delivery = self.subscription.recv() => match delivery {
                    Some(value) => {
                        self.engine.receive(value);
                    }
                    None => break,
                },
            }
        }
        info!(phase = %self.engine.phase(), "Replica event loop stopped");
        self.engine
    }

    fn handle_intent(&mut self, intent: Intent) {
        debug!(?intent, "Handling intent");
        // Rejections already reached the presenter.
        match intent {
            Intent::Join(symbol) => {
                let _ = self.engine.join(&symbol);
            }
            Intent::Move(index) => {
                let _ = self.engine.attempt_move(index);
            }
            Intent::Snapshot => self.engine.broadcast_snapshot(),
            Intent::Shutdown => {}
        }
    }
}
