//! Shared helpers for engine tests.

#![allow(dead_code)]

use serde_json::Value;
use tabsync::{GameState, Outbox, PlayerId, Presenter, SyncEngine};

/// Presenter that keeps every callback for inspection.
#[derive(Debug, Default)]
pub struct Recorder {
    pub states: Vec<GameState>,
    pub statuses: Vec<String>,
}

impl Recorder {
    pub fn last_status(&self) -> Option<&str> {
        self.statuses.last().map(String::as_str)
    }
}

impl Presenter for Recorder {
    fn on_state_changed(&mut self, state: &GameState) {
        self.states.push(state.clone());
    }

    fn on_status_message(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }
}

pub type TestEngine = SyncEngine<Outbox, Recorder>;

/// Engine whose broadcasts land in the returned outbox.
pub fn replica(identity: &str) -> (TestEngine, Outbox) {
    let outbox = Outbox::new();
    let engine = SyncEngine::new(PlayerId::new(identity), outbox.clone(), Recorder::default());
    (engine, outbox)
}

/// Delivers everything `from` has posted to each engine in `to`, in order.
pub fn deliver(from: &Outbox, to: &mut [&mut TestEngine]) -> Vec<Value> {
    let messages = from.drain();
    for engine in to.iter_mut() {
        for message in &messages {
            engine.receive(message.clone());
        }
    }
    messages
}
