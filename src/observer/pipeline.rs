// Observer pipeline run by the write guard before each store write

use std::collections::BTreeMap;
use std::time::Instant;
use tokio::time::timeout;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::implementations::{AuditStampObserver, EntryIdentityObserver};
use crate::observer::traits::{ObserverBox, ObserverRing};

/// Executes registered observers in ring order
pub struct ObserverPipeline {
    observers: BTreeMap<ObserverRing, Vec<ObserverBox>>,
}

impl ObserverPipeline {
    /// Create new observer pipeline with empty observer registry
    pub fn new() -> Self {
        Self {
            observers: BTreeMap::new(),
        }
    }

    /// Pipeline with the observers every write goes through
    pub fn with_defaults() -> Self {
        let mut pipeline = Self::new();
        pipeline.register_observer(ObserverBox::InputValidation(Box::new(EntryIdentityObserver)));
        pipeline.register_observer(ObserverBox::Enrichment(Box::new(AuditStampObserver)));
        pipeline
    }

    pub fn register_observer(&mut self, observer: ObserverBox) {
        let ring = observer.ring();
        let name = observer.name();
        self.observers.entry(ring).or_default().push(observer);

        tracing::debug!("Registered observer '{}' for ring {:?}", name, ring);
    }

    /// Run every ring relevant to the context's operation. Stops at the first ring that
    /// records an error and returns that error.
    pub async fn execute(&self, ctx: &mut ObserverContext<'_>) -> Result<(), ObserverError> {
        let relevant_rings = ObserverRing::for_operation(&ctx.operation);

        tracing::debug!(
            "Observer pipeline starting: operation={:?}, kind={}, entries={}",
            ctx.operation,
            ctx.kind,
            ctx.entries.len()
        );

        for ring in relevant_rings {
            self.execute_ring(ring, ctx).await;

            if let Some(error) = ctx.errors.first() {
                tracing::warn!("Observer pipeline stopped at ring {:?}: {}", ring, error);
                return Err(error.clone());
            }
        }

        tracing::debug!("Observer pipeline finished in {:?}", ctx.execution_time());
        Ok(())
    }

    async fn execute_ring(&self, ring: ObserverRing, ctx: &mut ObserverContext<'_>) {
        let observers = match self.observers.get(&ring) {
            Some(obs) => obs,
            None => {
                tracing::trace!("No observers registered for ring {:?}", ring);
                return;
            }
        };

        for observer in observers {
            if !observer.applies_to_operation(ctx.operation) || !observer.applies_to_kind(ctx.kind)
            {
                tracing::trace!("Observer {} skipped for {:?} {}", observer.name(), ctx.operation, ctx.kind);
                continue;
            }

            let observer_start = Instant::now();
            let result = timeout(observer.timeout(), observer.execute(ctx)).await;
            let execution_time = observer_start.elapsed();

            match result {
                Ok(Ok(())) => {
                    tracing::debug!(
                        "Observer: {} completed successfully in {:?}",
                        observer.name(),
                        execution_time
                    );
                }
                Ok(Err(error)) => {
                    tracing::warn!(
                        "Observer: {} failed in {:?}: {}",
                        observer.name(),
                        execution_time,
                        error
                    );
                    ctx.errors.push(error);
                }
                Err(_elapsed) => {
                    tracing::error!(
                        "Observer: {} timed out after {:?}",
                        observer.name(),
                        observer.timeout()
                    );
                    ctx.errors.push(ObserverError::TimeoutError(format!(
                        "Observer {} timed out after {:?}",
                        observer.name(),
                        observer.timeout()
                    )));
                }
            }
        }
    }
}

impl Default for ObserverPipeline {
    fn default() -> Self {
        Self::with_defaults()
    }
}
