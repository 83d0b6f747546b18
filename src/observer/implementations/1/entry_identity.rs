// Ring 1: Input Validation - tracked entries must match the operation they are part of
use async_trait::async_trait;

use crate::observer::context::{EntryState, ObserverContext};
use crate::observer::error::ObserverError;
use crate::observer::traits::{InputValidationObserver, Observer, ObserverRing, Operation};

/// Added entries must not carry an id; modified and deleted entries must
#[derive(Default)]
pub struct EntryIdentityObserver;

impl Observer for EntryIdentityObserver {
    fn name(&self) -> &'static str {
        "EntryIdentityObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::InputValidation
    }

    fn applies_to_operation(&self, _op: Operation) -> bool {
        true
    }
}

#[async_trait]
impl InputValidationObserver for EntryIdentityObserver {
    async fn execute(&self, ctx: &mut ObserverContext<'_>) -> Result<(), ObserverError> {
        if ctx.entries.is_empty() {
            return Err(ObserverError::PipelineError(format!(
                "{:?} {} has no tracked entries",
                ctx.operation, ctx.kind
            )));
        }

        for entry in &ctx.entries {
            let id = entry.entity.id();
            match entry.state {
                EntryState::Added if id != 0 => {
                    return Err(ObserverError::ValidationError(format!(
                        "new {} must not carry id {}",
                        ctx.kind, id
                    )));
                }
                EntryState::Modified | EntryState::Deleted if id <= 0 => {
                    return Err(ObserverError::ValidationError(format!(
                        "{} write requires a stored id",
                        ctx.kind
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
