//! Ephemeral player identities.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

/// Process-local player identity.
///
/// Generated once per replica at startup, never persisted and never checked
/// against any authority.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Generates a fresh identity such as `Player-3f9a1c2e`.
    #[instrument]
    pub fn generate(prefix: &str) -> Self {
        let token = Uuid::new_v4().simple().to_string();
        Self(format!("{}-{}", prefix, &token[..8]))
    }

    /// Wraps an existing identity string.
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
