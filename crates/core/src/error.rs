//! Domain error model.

use thiserror::Error;

use crate::validation::FieldErrors;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type returned by persistence ports.
pub type StoreResult<T> = Result<T, StoreError>;

/// Message used for every authentication failure that must not reveal why it failed.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Could not validate credentials";

/// Default message for an authorization denial.
pub const NOT_AUTHORIZED_MESSAGE: &str = "Not authorized";

/// Why a caller was refused.
///
/// The distinction only changes the status code; the payload shape is the same.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Denial {
    /// No identity, or the presented identity could not be verified.
    Unauthenticated,
    /// A verified identity without the required role.
    Forbidden,
}

/// Domain-level error.
///
/// This is a closed set: every variant has exactly one wire rendering in the
/// API dispatcher. Adding a failure mode means adding a variant here and a
/// matching arm there.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A record addressed by identifier does not exist (or is not visible to the caller).
    #[error("{resource} with identifier '{id}' not found")]
    RecordNotFound { resource: String, id: String },

    /// A record could not be saved because it breaks a business rule.
    #[error("{0}")]
    RecordInvalid(String),

    /// A required request parameter was absent.
    #[error("parameter '{0}' is required")]
    ParameterMissing(String),

    /// The request carried parameters the endpoint does not accept.
    #[error("unpermitted parameters: {}", .0.join(", "))]
    UnpermittedParameters(Vec<String>),

    /// The caller is not allowed to perform the operation.
    #[error("{message}")]
    NotAuthorized { message: String, denial: Denial },

    /// One or more request fields failed validation.
    #[error("validation failed for {} field(s)", .0.len())]
    ValidationFailed(FieldErrors),

    /// The request could not be interpreted at all (e.g. broken JSON).
    #[error("{0}")]
    MalformedInput(String),

    /// A programming or environment fault. The detail is for logs only.
    #[error("unexpected: {0}")]
    Unexpected(String),
}

impl DomainError {
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::RecordNotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::RecordInvalid(msg.into())
    }

    pub fn parameter_missing(param: impl Into<String>) -> Self {
        Self::ParameterMissing(param.into())
    }

    pub fn unpermitted<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::UnpermittedParameters(params.into_iter().map(Into::into).collect())
    }

    /// Missing or unverifiable identity (rendered as 401).
    pub fn unauthenticated() -> Self {
        Self::NotAuthorized {
            message: INVALID_CREDENTIALS_MESSAGE.to_string(),
            denial: Denial::Unauthenticated,
        }
    }

    /// Verified identity that lacks permission (rendered as 403).
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::NotAuthorized {
            message: msg.into(),
            denial: Denial::Forbidden,
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn unexpected(detail: impl Into<String>) -> Self {
        Self::Unexpected(detail.into())
    }
}

/// Failure reported by a persistence adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or is in a bad state.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness or integrity constraint rejected the write.
    #[error("{0}")]
    Conflict(String),
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => DomainError::RecordInvalid(msg),
            StoreError::Unavailable(msg) => DomainError::Unexpected(msg),
        }
    }
}
