//! In-process named broadcast channel.

use super::Transport;
use crate::TransportError;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
struct Envelope {
    origin: u64,
    body: Value,
}

/// A named channel every connected endpoint can post to.
///
/// Mirrors a browser `BroadcastChannel`: a post reaches every other
/// endpoint connected at the time of posting, never the poster itself, and
/// nothing is replayed for endpoints that connect later.
#[derive(Debug, Clone)]
pub struct LocalBus {
    name: Arc<str>,
    sender: broadcast::Sender<Envelope>,
    next_endpoint: Arc<AtomicU64>,
}

impl LocalBus {
    /// Opens a channel buffering up to `capacity` undelivered messages per
    /// receiver. Receivers that fall further behind lose the oldest ones.
    #[instrument(skip(name))]
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        let name: Arc<str> = Arc::from(name.into());
        let (sender, _) = broadcast::channel(capacity.max(1));
        debug!(channel = %name, "Opened local bus");
        Self {
            name,
            sender,
            next_endpoint: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Connects a new endpoint, returning its posting and receiving halves.
    #[instrument(skip(self), fields(channel = %self.name))]
    pub fn connect(&self) -> (BusEndpoint, Subscription) {
        let id = self.next_endpoint.fetch_add(1, Ordering::Relaxed);
        debug!(endpoint = id, "Endpoint connected");
        let endpoint = BusEndpoint {
            id,
            channel: Arc::clone(&self.name),
            sender: Some(self.sender.clone()),
        };
        let subscription = Subscription {
            id,
            channel: Arc::clone(&self.name),
            receiver: self.sender.subscribe(),
        };
        (endpoint, subscription)
    }
}

/// Posting half of a bus connection.
#[derive(Debug)]
pub struct BusEndpoint {
    id: u64,
    channel: Arc<str>,
    sender: Option<broadcast::Sender<Envelope>>,
}

impl BusEndpoint {
    /// Stops posting. Later posts fail.
    pub fn close(&mut self) {
        self.sender = None;
    }

    /// Whether [`BusEndpoint::close`] was called.
    pub fn is_closed(&self) -> bool {
        self.sender.is_none()
    }
}

impl Transport for BusEndpoint {
    #[instrument(skip(self, message), fields(channel = %self.channel, endpoint = self.id))]
    fn post(&mut self, message: Value) -> Result<(), TransportError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| TransportError::new(format!("Channel '{}' is closed", self.channel)))?;
        let envelope = Envelope {
            origin: self.id,
            body: message,
        };
        // Posting with nobody listening is not a failure.
        if sender.send(envelope).is_err() {
            debug!("No listeners on channel");
        }
        Ok(())
    }
}

/// Receiving half of a bus connection.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    channel: Arc<str>,
    receiver: broadcast::Receiver<Envelope>,
}

impl Subscription {
    /// Waits for the next message from another endpoint.
    ///
    /// Returns `None` once every posting half is gone. Cancel safe.
    pub async fn recv(&mut self) -> Option<Value> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) if envelope.origin == self.id => continue,
                Ok(envelope) => return Some(envelope.body),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(channel = %self.channel, skipped, "Subscriber lagged, messages lost");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Takes the next already-queued message from another endpoint.
    pub fn try_recv(&mut self) -> Option<Value> {
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) if envelope.origin == self.id => continue,
                Ok(envelope) => return Some(envelope.body),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(channel = %self.channel, skipped, "Subscriber lagged, messages lost");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_reaches_others_but_not_self() {
        let bus = LocalBus::new("gameChannel", 8);
        let (mut a, mut a_rx) = bus.connect();
        let (_b, mut b_rx) = bus.connect();

        a.post(json!({"type": "move"})).unwrap();

        assert_eq!(b_rx.try_recv(), Some(json!({"type": "move"})));
        assert_eq!(a_rx.try_recv(), None);
    }

    #[test]
    fn test_no_replay_for_late_endpoints() {
        let bus = LocalBus::new("gameChannel", 8);
        let (mut a, _a_rx) = bus.connect();
        a.post(json!(1)).unwrap();

        let (_late, mut late_rx) = bus.connect();
        assert_eq!(late_rx.try_recv(), None);
    }

    #[test]
    fn test_per_sender_order_is_kept() {
        let bus = LocalBus::new("gameChannel", 8);
        let (mut a, _a_rx) = bus.connect();
        let (_b, mut b_rx) = bus.connect();
        for n in 0..3 {
            a.post(json!(n)).unwrap();
        }
        let received: Vec<_> = std::iter::from_fn(|| b_rx.try_recv()).collect();
        assert_eq!(received, vec![json!(0), json!(1), json!(2)]);
    }

    #[test]
    fn test_closed_endpoint_fails_to_post() {
        let bus = LocalBus::new("gameChannel", 8);
        let (mut a, _a_rx) = bus.connect();
        a.close();
        assert!(a.is_closed());
        assert!(a.post(json!(1)).is_err());
    }

    #[test]
    fn test_lagging_subscriber_skips_oldest() {
        let bus = LocalBus::new("gameChannel", 2);
        let (mut a, _a_rx) = bus.connect();
        let (_b, mut b_rx) = bus.connect();
        for n in 0..4 {
            a.post(json!(n)).unwrap();
        }
        let received: Vec<_> = std::iter::from_fn(|| b_rx.try_recv()).collect();
        assert_eq!(received, vec![json!(2), json!(3)]);
    }
}
