use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::entity::{Entity, EntityKind};

// No audit columns and no row version: contingents are neither stamped nor version-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Contingent {
    pub id: i32,
    pub code: String,
    pub name: String,
}

impl Contingent {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: 0,
            code: code.into(),
            name: name.into(),
        }
    }
}

impl Entity for Contingent {
    fn kind() -> EntityKind {
        EntityKind::Contingent
    }

    fn entity_kind(&self) -> EntityKind {
        EntityKind::Contingent
    }

    fn id(&self) -> i32 {
        self.id
    }
}
