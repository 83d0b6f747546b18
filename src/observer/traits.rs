use async_trait::async_trait;
use std::time::Duration;

use crate::database::models::EntityKind;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;

/// Observer rings, executed in ascending order before the store write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ObserverRing {
    InputValidation = 1, // Entry shape checks before anything is stamped
    Enrichment = 4,      // Audit stamps, computed fields
}

impl ObserverRing {
    /// Rings that run for an operation
    pub fn for_operation(operation: &Operation) -> Vec<Self> {
        use ObserverRing::*;

        match operation {
            Operation::Create | Operation::Update => vec![InputValidation, Enrichment],
            Operation::Delete => vec![InputValidation],
        }
    }
}

/// Write operations routed through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

/// Base trait for all observers with metadata and applicability checks
pub trait Observer: Send + Sync {
    /// Observer name for logging and debugging
    fn name(&self) -> &'static str;

    /// Which ring this observer belongs to
    fn ring(&self) -> ObserverRing;

    /// Check if observer applies to this operation
    fn applies_to_operation(&self, op: Operation) -> bool;

    /// Check if observer applies to this entity type
    fn applies_to_kind(&self, _kind: EntityKind) -> bool {
        true
    }

    /// Execution timeout (default 5 seconds)
    fn timeout(&self) -> Duration {
        Duration::from_secs(5)
    }
}

/// Ring 1: Input Validation
#[async_trait]
pub trait InputValidationObserver: Observer {
    async fn execute(&self, ctx: &mut ObserverContext<'_>) -> Result<(), ObserverError>;
}

/// Ring 4: Enrichment
#[async_trait]
pub trait EnrichmentObserver: Observer {
    async fn execute(&self, ctx: &mut ObserverContext<'_>) -> Result<(), ObserverError>;
}

/// Concrete observer types for dynamic dispatch
pub enum ObserverBox {
    InputValidation(Box<dyn InputValidationObserver>),
    Enrichment(Box<dyn EnrichmentObserver>),
}

impl ObserverBox {
    pub fn name(&self) -> &'static str {
        match self {
            ObserverBox::InputValidation(o) => o.name(),
            ObserverBox::Enrichment(o) => o.name(),
        }
    }

    pub fn ring(&self) -> ObserverRing {
        match self {
            ObserverBox::InputValidation(o) => o.ring(),
            ObserverBox::Enrichment(o) => o.ring(),
        }
    }

    pub fn applies_to_operation(&self, op: Operation) -> bool {
        match self {
            ObserverBox::InputValidation(o) => o.applies_to_operation(op),
            ObserverBox::Enrichment(o) => o.applies_to_operation(op),
        }
    }

    pub fn applies_to_kind(&self, kind: EntityKind) -> bool {
        match self {
            ObserverBox::InputValidation(o) => o.applies_to_kind(kind),
            ObserverBox::Enrichment(o) => o.applies_to_kind(kind),
        }
    }

    pub fn timeout(&self) -> Duration {
        match self {
            ObserverBox::InputValidation(o) => o.timeout(),
            ObserverBox::Enrichment(o) => o.timeout(),
        }
    }

    pub async fn execute(&self, ctx: &mut ObserverContext<'_>) -> Result<(), ObserverError> {
        match self {
            ObserverBox::InputValidation(o) => o.execute(ctx).await,
            ObserverBox::Enrichment(o) => o.execute(ctx).await,
        }
    }
}
