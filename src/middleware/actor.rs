use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::auth::Actor;

/// Name of the request header carrying the caller's identity
#[derive(Debug, Clone)]
pub struct IdentityHeader(Arc<str>);

impl IdentityHeader {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name.trim().to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Resolves the audit actor from the identity header held in router state. Requests
/// without an identity are stamped as `Unknown`; extraction never rejects.
#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    IdentityHeader: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = IdentityHeader::from_ref(state);
        Ok(actor_from_parts(parts, header.as_str()))
    }
}

fn actor_from_parts(parts: &Parts, header: &str) -> Actor {
    let identity = parts
        .headers
        .get(header)
        .and_then(|value| value.to_str().ok());
    Actor::from_identity(identity)
}
