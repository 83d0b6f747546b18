use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity recorded in audit stamps.
///
/// Request paths resolve it from the configured identity header; non-request paths
/// (seeding, batch work) use `Actor::seed()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor(String);

impl Actor {
    pub const SEED: &'static str = "Seed Data";
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn seed() -> Self {
        Self(Self::SEED.to_string())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    /// Actor for a request identity, falling back to `Unknown` when absent or blank
    pub fn from_identity(identity: Option<&str>) -> Self {
        match identity.map(str::trim) {
            Some(name) if !name.is_empty() => Self::new(name),
            _ => Self::unknown(),
        }
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
