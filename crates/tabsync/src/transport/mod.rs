//! Transport abstraction for replica-to-replica delivery.
//!
//! The engine only ever posts; delivery into the engine is driven by
//! whoever owns the receiving side (see [`Replica`](crate::Replica)). The
//! engine depends on no more than these semantics:
//!
//! - best-effort delivery to every other live replica on the channel,
//! - no replay for replicas that connect later,
//! - per-sender FIFO order, nothing across senders.

mod bus;
mod outbox;

pub use bus::{BusEndpoint, LocalBus, Subscription};
pub use outbox::Outbox;

use crate::TransportError;
use serde_json::Value;

/// Outbound half of a pub/sub channel.
pub trait Transport: Send {
    /// Posts a structured message to every other replica.
    ///
    /// Must not block. An `Ok` return promises nothing about delivery.
    fn post(&mut self, message: Value) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post(&mut self, message: Value) -> Result<(), TransportError> {
        (**self).post(message)
    }
}
