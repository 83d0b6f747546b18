use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::auth::Actor;
use crate::database::models::{Entity, EntityKind};
use crate::observer::error::ObserverError;
use crate::observer::traits::Operation;

/// Tracked state of an entity about to be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Added,
    Modified,
    Deleted,
}

impl From<Operation> for EntryState {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::Create => EntryState::Added,
            Operation::Update => EntryState::Modified,
            Operation::Delete => EntryState::Deleted,
        }
    }
}

/// An entity participating in the current write, borrowed from the caller
pub struct TrackedEntry<'a> {
    pub state: EntryState,
    pub entity: &'a mut dyn Entity,
}

/// Data flowing through the observer pipeline for one write operation.
/// `now` is captured once so every entry touched by the write shares a timestamp.
pub struct ObserverContext<'a> {
    pub operation: Operation,
    pub kind: EntityKind,
    pub actor: Actor,
    pub now: DateTime<Utc>,
    pub entries: Vec<TrackedEntry<'a>>,

    // Performance tracking
    pub start_time: Instant,

    pub errors: Vec<ObserverError>,
}

impl<'a> ObserverContext<'a> {
    pub fn new(operation: Operation, kind: EntityKind, actor: Actor) -> Self {
        Self {
            operation,
            kind,
            actor,
            now: Utc::now(),
            entries: Vec::new(),
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    /// Track an entity in the state implied by the operation
    pub fn track(mut self, entity: &'a mut dyn Entity) -> Self {
        self.entries.push(TrackedEntry {
            state: self.operation.into(),
            entity,
        });
        self
    }

    pub fn execution_time(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}
