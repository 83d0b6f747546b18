use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::Actor;
use crate::database::models::{Entity, EntityKind, RowVersion};
use crate::database::store::{Repository, Store, StoreError};
use crate::observer::{ObserverContext, ObserverPipeline, Operation};

/// Outcome taxonomy for guarded writes. Success is the `Ok` side of the result.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("{0} record not found")]
    NotFound(EntityKind),

    #[error("{0} has been removed")]
    ConcurrencyRemoved(EntityKind),

    #[error("{0} has been updated by another user")]
    ConcurrencyModified(EntityKind),

    #[error("duplicate {kind} {field}")]
    UniqueViolation { kind: EntityKind, field: &'static str },

    #[error("{0} still has athletes assigned")]
    ReferentialIntegrity(EntityKind),

    #[error("{kind} references a missing {parent}")]
    MissingReference { kind: EntityKind, parent: EntityKind },

    #[error("{operation:?} {kind} failed: {detail}")]
    Unknown {
        kind: EntityKind,
        operation: Operation,
        detail: String,
    },
}

impl PersistenceError {
    fn unknown(kind: EntityKind, operation: Operation, detail: impl ToString) -> Self {
        PersistenceError::Unknown {
            kind,
            operation,
            detail: detail.to_string(),
        }
    }

    /// Classify a store failure raised by a write
    fn from_store(kind: EntityKind, operation: Operation, err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { constraint } => {
                warn!("{:?} {} rejected by {}", operation, kind, constraint);
                PersistenceError::UniqueViolation {
                    kind,
                    field: kind.unique_field(),
                }
            }
            StoreError::ForeignKeyViolation { constraint } => {
                warn!("{:?} {} rejected by {}", operation, kind, constraint);
                if operation == Operation::Delete {
                    return PersistenceError::ReferentialIntegrity(kind);
                }
                match EntityKind::parent_for_constraint(&constraint) {
                    Some(parent) => PersistenceError::MissingReference { kind, parent },
                    None => PersistenceError::unknown(kind, operation, constraint),
                }
            }
            StoreError::Backend(detail) => {
                error!("{:?} {} failed in store: {}", operation, kind, detail);
                PersistenceError::unknown(kind, operation, detail)
            }
        }
    }
}

/// Applies the concurrency and integrity discipline to every write. The actor is an
/// explicit argument so audit stamping never reads ambient state.
#[derive(Clone)]
pub struct WriteGuard {
    store: Arc<dyn Store>,
    pipeline: Arc<ObserverPipeline>,
}

impl WriteGuard {
    pub fn new(store: Arc<dyn Store>, pipeline: Arc<ObserverPipeline>) -> Self {
        Self { store, pipeline }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Insert a new record, returning it with the store-assigned id and row version
    pub async fn create<E>(&self, actor: &Actor, mut entity: E) -> Result<E, PersistenceError>
    where
        E: Entity + 'static,
        dyn Store: Repository<E>,
    {
        let kind = E::kind();
        self.observe(Operation::Create, actor, &mut entity).await?;

        let saved = Repository::<E>::insert(self.store.as_ref(), &entity)
            .await
            .map_err(|e| PersistenceError::from_store(kind, Operation::Create, e))?;

        debug!("Created {} {} for {}", kind, saved.id(), actor);
        Ok(saved)
    }

    /// Load the stored record, let `apply` overwrite its fields, then write it only if
    /// the stored row version still equals `expected`.
    pub async fn update<E, F>(
        &self,
        actor: &Actor,
        id: i32,
        expected: Option<RowVersion>,
        apply: F,
    ) -> Result<E, PersistenceError>
    where
        E: Entity + 'static,
        dyn Store: Repository<E>,
        F: FnOnce(&mut E) + Send,
    {
        let kind = E::kind();
        let store = self.store.as_ref();

        let mut entity = match Repository::<E>::find(store, id).await {
            Ok(Some(entity)) => entity,
            Ok(None) => {
                warn!("Update of {} {} found no record", kind, id);
                return Err(PersistenceError::ConcurrencyRemoved(kind));
            }
            Err(e) => return Err(PersistenceError::from_store(kind, Operation::Update, e)),
        };

        apply(&mut entity);
        self.observe(Operation::Update, actor, &mut entity).await?;

        let outcome = Repository::<E>::update(store, &entity, expected)
            .await
            .map_err(|e| PersistenceError::from_store(kind, Operation::Update, e))?;

        match outcome {
            Some(saved) => {
                debug!("Updated {} {} for {}", kind, id, actor);
                Ok(saved)
            }
            None => {
                // Zero rows matched: the record vanished or its token moved on.
                let still_there = Repository::<E>::exists(store, id)
                    .await
                    .map_err(|e| PersistenceError::from_store(kind, Operation::Update, e))?;
                if still_there {
                    warn!("Stale row version {:?} for {} {}", expected, kind, id);
                    Err(PersistenceError::ConcurrencyModified(kind))
                } else {
                    warn!("{} {} removed during update", kind, id);
                    Err(PersistenceError::ConcurrencyRemoved(kind))
                }
            }
        }
    }

    /// Physically remove a record; rejected while children still reference it
    pub async fn delete<E>(&self, actor: &Actor, id: i32) -> Result<(), PersistenceError>
    where
        E: Entity + 'static,
        dyn Store: Repository<E>,
    {
        let kind = E::kind();
        let store = self.store.as_ref();

        let mut entity = Repository::<E>::find(store, id)
            .await
            .map_err(|e| PersistenceError::from_store(kind, Operation::Delete, e))?
            .ok_or(PersistenceError::NotFound(kind))?;

        self.observe(Operation::Delete, actor, &mut entity).await?;

        let deleted = Repository::<E>::delete(store, id)
            .await
            .map_err(|e| PersistenceError::from_store(kind, Operation::Delete, e))?;

        if !deleted {
            return Err(PersistenceError::NotFound(kind));
        }
        debug!("Deleted {} {} for {}", kind, id, actor);
        Ok(())
    }

    async fn observe(
        &self,
        operation: Operation,
        actor: &Actor,
        entity: &mut dyn Entity,
    ) -> Result<(), PersistenceError> {
        let kind = entity.entity_kind();
        let mut ctx = ObserverContext::new(operation, kind, actor.clone()).track(entity);
        self.pipeline
            .execute(&mut ctx)
            .await
            .map_err(|e| PersistenceError::unknown(kind, operation, e))
    }
}
