//! The error dispatcher: every failure a handler can produce ends up here and
//! leaves as one JSON envelope, `{"errors": {...}, "timestamp": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use shelfmate_auth::{AuthError, AuthzError, PasswordError, TokenInvalid, TokenIssueError};
use shelfmate_core::{Denial, DomainError, StoreError};

use crate::app::response::json_response;

/// Fixed client message for anything that is not a domain error.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error type returned by every handler, extractor, and middleware.
#[derive(Debug)]
pub enum ApiError {
    /// A member of the closed domain taxonomy.
    Domain(DomainError),
    /// Anything else. Logged in full, rendered as an opaque 500.
    Unexpected(anyhow::Error),
}

impl ApiError {
    pub fn unexpected(err: impl Into<anyhow::Error>) -> Self {
        Self::Unexpected(err.into())
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self::Domain(value)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::Unexpected(value)
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        Self::Domain(value.into())
    }
}

impl From<TokenInvalid> for ApiError {
    fn from(value: TokenInvalid) -> Self {
        tracing::debug!(reason = ?value.reason(), "token rejected");
        Self::Domain(DomainError::unauthenticated())
    }
}

impl From<TokenIssueError> for ApiError {
    fn from(value: TokenIssueError) -> Self {
        Self::unexpected(value)
    }
}

impl From<PasswordError> for ApiError {
    fn from(value: PasswordError) -> Self {
        Self::unexpected(value)
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidCredentials => Self::Domain(DomainError::unauthenticated()),
            AuthError::Store(e) => e.into(),
            other => Self::unexpected(other),
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Anonymous => Self::Domain(DomainError::unauthenticated()),
            AuthzError::RoleMismatch { .. } => {
                Self::Domain(DomainError::forbidden(shelfmate_core::error::NOT_AUTHORIZED_MESSAGE))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        dispatch(self)
    }
}

/// Render any error as the uniform error envelope.
pub fn dispatch(err: ApiError) -> Response {
    let (status, errors) = match err {
        ApiError::Domain(domain) => render(domain),
        ApiError::Unexpected(e) => {
            tracing::error!(error = ?e, "unhandled error");
            internal()
        }
    };
    json_response(status, json!({ "errors": errors }))
}

fn internal() -> (StatusCode, Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": INTERNAL_ERROR_MESSAGE }),
    )
}

/// Status code and `errors` payload for each domain kind.
///
/// No wildcard arm: a new variant does not compile until it gets a row here.
fn render(err: DomainError) -> (StatusCode, Value) {
    match err {
        DomainError::RecordNotFound { .. } => (
            StatusCode::NOT_FOUND,
            json!({ "message": err.to_string() }),
        ),
        DomainError::RecordInvalid(message) => {
            (StatusCode::UNPROCESSABLE_ENTITY, json!({ "message": message }))
        }
        DomainError::ParameterMissing(param) => {
            let mut errors = serde_json::Map::new();
            errors.insert(param, json!(["parameter is required"]));
            (StatusCode::BAD_REQUEST, Value::Object(errors))
        }
        DomainError::UnpermittedParameters(params) => (
            StatusCode::BAD_REQUEST,
            json!({ "unknown_parameters": params }),
        ),
        DomainError::NotAuthorized { message, denial } => {
            let status = match denial {
                Denial::Unauthenticated => StatusCode::UNAUTHORIZED,
                Denial::Forbidden => StatusCode::FORBIDDEN,
            };
            (status, json!({ "message": message }))
        }
        DomainError::ValidationFailed(fields) => (StatusCode::UNPROCESSABLE_ENTITY, json!(fields)),
        DomainError::MalformedInput(message) => {
            (StatusCode::BAD_REQUEST, json!({ "message": message }))
        }
        DomainError::Unexpected(detail) => {
            tracing::error!(%detail, "unexpected domain failure");
            internal()
        }
    }
}
