use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::Actor;

/// Created/updated stamps shared by auditable records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditFields {
    pub created_by: Option<String>,
    pub created_on: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    pub updated_on: Option<DateTime<Utc>>,
}

/// Capability implemented by records that carry `AuditFields`
pub trait Auditable {
    fn audit_mut(&mut self) -> &mut AuditFields;

    /// Stamp a record that is about to be inserted
    fn set_created(&mut self, actor: &Actor, at: DateTime<Utc>) {
        let audit = self.audit_mut();
        audit.created_by = Some(actor.name().to_string());
        audit.created_on = Some(at);
        audit.updated_by = Some(actor.name().to_string());
        audit.updated_on = Some(at);
    }

    /// Stamp a persisted record that is about to be rewritten
    fn set_updated(&mut self, actor: &Actor, at: DateTime<Utc>) {
        let audit = self.audit_mut();
        audit.updated_by = Some(actor.name().to_string());
        audit.updated_on = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Sport;
    use chrono::Duration;

    #[test]
    fn created_stamps_both_pairs_identically() {
        let mut sport = Sport::new("SWM", "Swimming");
        let now = Utc::now();
        sport.set_created(&Actor::new("coach"), now);
        let audit = &sport.audit;

        assert_eq!(audit.created_by.as_deref(), Some("coach"));
        assert_eq!(audit.updated_by.as_deref(), Some("coach"));
        assert_eq!(audit.created_on, Some(now));
        assert_eq!(audit.updated_on, Some(now));
    }

    #[test]
    fn updated_leaves_created_pair_alone() {
        let mut sport = Sport::new("SWM", "Swimming");
        let created = Utc::now();
        sport.set_created(&Actor::seed(), created);

        let later = created + Duration::seconds(30);
        sport.set_updated(&Actor::new("official"), later);
        let audit = &sport.audit;

        assert_eq!(audit.created_by.as_deref(), Some("Seed Data"));
        assert_eq!(audit.created_on, Some(created));
        assert_eq!(audit.updated_by.as_deref(), Some("official"));
        assert_eq!(audit.updated_on, Some(later));
    }
}
