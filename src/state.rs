use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::AppConfig;
use crate::database::store::Store;
use crate::middleware::actor::IdentityHeader;
use crate::observer::ObserverPipeline;
use crate::services::guard::WriteGuard;

/// Shared handler state: the store for reads, the guard for writes, and the header
/// the actor extractor reads
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub guard: WriteGuard,
    pub identity_header: IdentityHeader,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &AppConfig) -> Self {
        let pipeline = Arc::new(ObserverPipeline::with_defaults());
        Self {
            guard: WriteGuard::new(store.clone(), pipeline),
            store,
            identity_header: IdentityHeader::new(&config.security.identity_header),
        }
    }
}

impl FromRef<AppState> for IdentityHeader {
    fn from_ref(state: &AppState) -> Self {
        state.identity_header.clone()
    }
}
