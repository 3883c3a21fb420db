//! Core types shared by the collection controller and its collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity: opaque identifier of a user (owner of expenses, assignee of tickets).
///
/// Compared by identity, never normalized.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Identity(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(id: &str) -> Self {
        Identity::new(id)
    }
}

/// Generation: monotonic request epoch.
///
/// Incremented exactly once per reset fetch. A response is applied iff the
/// generation it was issued under is still the controller's current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Generation(u64);

impl Generation {
    /// The generation of a controller that has never fetched.
    pub const INITIAL: Generation = Generation(0);

    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SentinelHandle: identifies the end-of-list marker owned by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SentinelHandle(u64);

impl SentinelHandle {
    pub fn new(id: u64) -> Self {
        SentinelHandle(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}
