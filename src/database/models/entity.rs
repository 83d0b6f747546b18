use std::fmt;

use super::audit::Auditable;

/// Concurrency token carried by versioned records. Bumped by the store on every successful update.
pub type RowVersion = i64;

/// The three record types persisted by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Sport,
    Contingent,
    Athlete,
}

impl EntityKind {
    /// Display name used in messages and routes
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Sport => "Sport",
            EntityKind::Contingent => "Contingent",
            EntityKind::Athlete => "Athlete",
        }
    }

    /// Wire name of the single uniqueness-constrained field
    pub fn unique_field(&self) -> &'static str {
        match self {
            EntityKind::Sport | EntityKind::Contingent => "code",
            EntityKind::Athlete => "athleteCode",
        }
    }

    /// Name of the unique constraint guarding `unique_field`
    pub fn unique_constraint(&self) -> &'static str {
        match self {
            EntityKind::Sport => "sports_code_key",
            EntityKind::Contingent => "contingents_code_key",
            EntityKind::Athlete => "athletes_athlete_code_key",
        }
    }

    /// Parent entity referenced by a foreign key constraint, if the name is one of ours
    pub fn parent_for_constraint(constraint: &str) -> Option<EntityKind> {
        match constraint {
            "athletes_sport_id_fkey" => Some(EntityKind::Sport),
            "athletes_contingent_id_fkey" => Some(EntityKind::Contingent),
            _ => None,
        }
    }

    pub fn route(&self) -> String {
        format!("/api/{}", self.name())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A persisted record. Object safe so the observer pipeline can work over `&mut dyn Entity`.
pub trait Entity: Send + Sync {
    fn kind() -> EntityKind
    where
        Self: Sized;

    fn entity_kind(&self) -> EntityKind;

    /// Store-assigned identifier; 0 until inserted
    fn id(&self) -> i32;

    /// Concurrency token, for versioned entities
    fn row_version(&self) -> Option<RowVersion> {
        None
    }

    /// Auditable capability. Entities without audit columns keep the default.
    fn as_auditable_mut(&mut self) -> Option<&mut dyn Auditable> {
        None
    }
}
