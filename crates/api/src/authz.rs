//! API-side role guard, run by handlers before touching any store.

use shelfmate_auth::{AuthzError, Identity, Role, authorize};
use shelfmate_core::DomainError;

use crate::app::errors::ApiError;

pub const ADMIN_REQUIRED_MESSAGE: &str = "Admin access required";

/// Require `identity` to hold exactly `required`; `message` is shown on a 403.
pub fn require_role(identity: &Identity, required: &Role, message: &str) -> Result<(), ApiError> {
    match authorize(Some(identity), required) {
        Ok(()) => Ok(()),
        Err(AuthzError::RoleMismatch { required, actual }) => {
            tracing::debug!(%required, %actual, subject = %identity.subject, "role check failed");
            Err(DomainError::forbidden(message).into())
        }
        Err(other) => Err(other.into()),
    }
}

pub fn require_admin(identity: &Identity) -> Result<(), ApiError> {
    require_role(identity, &Role::ADMIN, ADMIN_REQUIRED_MESSAGE)
}
