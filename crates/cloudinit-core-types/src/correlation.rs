//! Correlation identifiers for reconcile ticks
//!
//! A render is a pure function, but the orchestration layer around it runs
//! many of them concurrently. These ids let log events from one reconcile
//! tick be grouped together.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a single reconcile tick
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a fresh time-ordered id (UUIDv7)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Context carried through one reconcile tick
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: RequestId,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }
}
