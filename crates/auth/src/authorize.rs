use thiserror::Error;

use crate::{Identity, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("no authenticated identity")]
    Anonymous,

    #[error("role '{required}' required, caller has '{actual}'")]
    RoleMismatch { required: Role, actual: Role },
}

/// Allow the caller iff its role equals `required`.
///
/// - No IO
/// - No panics
/// - No role hierarchy: `admin` does not satisfy a `user` check.
pub fn authorize(identity: Option<&Identity>, required: &Role) -> Result<(), AuthzError> {
    let identity = identity.ok_or(AuthzError::Anonymous)?;
    if &identity.role == required {
        Ok(())
    } else {
        Err(AuthzError::RoleMismatch {
            required: required.clone(),
            actual: identity.role.clone(),
        })
    }
}
