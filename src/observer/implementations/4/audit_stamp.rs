// Ring 4: Enrichment - created/updated stamps on auditable entities
use async_trait::async_trait;

use crate::observer::context::{EntryState, ObserverContext};
use crate::observer::error::ObserverError;
use crate::observer::traits::{EnrichmentObserver, Observer, ObserverRing, Operation};

/// Stamps every tracked entry that exposes the auditable capability.
/// Added entries get both pairs; modified entries only the updated pair.
#[derive(Default)]
pub struct AuditStampObserver;

impl Observer for AuditStampObserver {
    fn name(&self) -> &'static str {
        "AuditStampObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Enrichment
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }
}

#[async_trait]
impl EnrichmentObserver for AuditStampObserver {
    async fn execute(&self, ctx: &mut ObserverContext<'_>) -> Result<(), ObserverError> {
        let actor = ctx.actor.clone();
        let now = ctx.now;
        let mut stamped = 0usize;

        for entry in ctx.entries.iter_mut() {
            let state = entry.state;
            let Some(auditable) = entry.entity.as_auditable_mut() else {
                continue;
            };
            match state {
                EntryState::Added => auditable.set_created(&actor, now),
                EntryState::Modified => auditable.set_updated(&actor, now),
                EntryState::Deleted => continue,
            }
            stamped += 1;
        }

        tracing::debug!("Stamped {} {} entries for {}", stamped, ctx.kind, actor);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Actor;
    use crate::database::models::{EntityKind, Sport};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn modified_entry_keeps_created_pair() {
        let created = Utc::now() - Duration::days(2);
        let mut sport = Sport::new("ATH", "Athletics");
        sport.id = 7;
        sport.audit.created_by = Some("Seed Data".to_string());
        sport.audit.created_on = Some(created);

        let mut ctx = ObserverContext::new(Operation::Update, EntityKind::Sport, Actor::new("editor"))
            .track(&mut sport);
        let now = ctx.now;
        AuditStampObserver.execute(&mut ctx).await.unwrap();
        drop(ctx);

        assert_eq!(sport.audit.created_by.as_deref(), Some("Seed Data"));
        assert_eq!(sport.audit.created_on, Some(created));
        assert_eq!(sport.audit.updated_by.as_deref(), Some("editor"));
        assert_eq!(sport.audit.updated_on, Some(now));
    }

    #[tokio::test]
    async fn every_tracked_entry_shares_one_timestamp() {
        let mut first = Sport::new("ATH", "Athletics");
        let mut second = Sport::new("SWM", "Swimming");

        let mut ctx = ObserverContext::new(Operation::Create, EntityKind::Sport, Actor::seed())
            .track(&mut first)
            .track(&mut second);
        AuditStampObserver.execute(&mut ctx).await.unwrap();
        drop(ctx);

        assert_eq!(first.audit.created_on, second.audit.created_on);
        assert_eq!(second.audit.created_by.as_deref(), Some("Seed Data"));
    }
}
