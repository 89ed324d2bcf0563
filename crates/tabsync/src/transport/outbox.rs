//! Transport that keeps posted messages for manual delivery.

use super::Transport;
use crate::TransportError;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::instrument;

/// Records every posted message instead of delivering it.
///
/// Clones share the same queue, so a test or tool can hand one clone to an
/// engine and drain the other to deliver messages late, out of order,
/// twice, or not at all.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    sent: Arc<Mutex<Vec<Value>>>,
}

impl Outbox {
    /// Creates an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything posted so far, oldest first.
    #[instrument(skip(self))]
    pub fn drain(&self) -> Vec<Value> {
        match self.sent.lock() {
            Ok(mut sent) => std::mem::take(&mut *sent),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Number of messages waiting.
    pub fn len(&self) -> usize {
        match self.sent.lock() {
            Ok(sent) => sent.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Transport for Outbox {
    fn post(&mut self, message: Value) -> Result<(), TransportError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| TransportError::new("Outbox lock poisoned"))?;
        sent.push(message);
        Ok(())
    }
}
