use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::audit::{AuditFields, Auditable};
use super::entity::{Entity, EntityKind, RowVersion};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Sport {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub row_version: RowVersion,
    #[sqlx(flatten)]
    pub audit: AuditFields,
}

impl Sport {
    /// Unsaved sport; id and row version are assigned by the store
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: 0,
            code: code.into(),
            name: name.into(),
            row_version: 0,
            audit: AuditFields::default(),
        }
    }
}

impl Auditable for Sport {
    fn audit_mut(&mut self) -> &mut AuditFields {
        &mut self.audit
    }
}

impl Entity for Sport {
    fn kind() -> EntityKind {
        EntityKind::Sport
    }

    fn entity_kind(&self) -> EntityKind {
        EntityKind::Sport
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn row_version(&self) -> Option<RowVersion> {
        Some(self.row_version)
    }

    fn as_auditable_mut(&mut self) -> Option<&mut dyn Auditable> {
        Some(self)
    }
}
