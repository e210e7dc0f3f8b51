use axum::{extract::FromRequestParts, http::request::Parts};

use shelfmate_auth::Identity;
use shelfmate_core::DomainError;

use crate::app::errors::ApiError;

/// The authenticated caller of a protected route.
///
/// Set by `auth_middleware`; extracting it on a route without that layer
/// yields the same 401 as a missing token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub Identity);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Caller)
            .ok_or_else(|| DomainError::unauthenticated().into())
    }
}
