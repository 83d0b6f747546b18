use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Athlete, Contingent, Entity, RowVersion, Sport};

/// Failures surfaced by a store backend. Constraint names follow the Postgres
/// naming used by the migrations so both backends classify identically.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            let constraint = db_error.constraint().unwrap_or_default().to_string();
            match db_error.code().as_deref() {
                Some("23505") => return StoreError::UniqueViolation { constraint },
                Some("23503") => return StoreError::ForeignKeyViolation { constraint },
                _ => {}
            }
        }
        StoreError::Backend(error.to_string())
    }
}

/// Parent of an athlete listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    Sport(i32),
    Contingent(i32),
}

/// Per-entity persistence operations. Each call is a single statement against the store.
#[async_trait]
pub trait Repository<E: Entity + 'static>: Send + Sync {
    /// All records, ordered for display
    async fn list(&self) -> Result<Vec<E>, StoreError>;

    async fn find(&self, id: i32) -> Result<Option<E>, StoreError>;

    /// Insert and return the stored record with its assigned id and initial row version
    async fn insert(&self, entity: &E) -> Result<E, StoreError>;

    /// Rewrite a record. When `expected` is set the write only applies if the stored
    /// row version still matches it. `None` means zero rows matched.
    async fn update(&self, entity: &E, expected: Option<RowVersion>)
        -> Result<Option<E>, StoreError>;

    /// Physically remove a record; `false` when nothing was deleted
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;

    async fn exists(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.find(id).await?.is_some())
    }
}

/// Complete persistence seam used by the API
#[async_trait]
pub trait Store: Repository<Sport> + Repository<Contingent> + Repository<Athlete> {
    /// Athletes belonging to a sport or contingent, ordered by last then first name
    async fn athletes_by_parent(&self, parent: ParentRef) -> Result<Vec<Athlete>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    fn backend_name(&self) -> &'static str;
}
