use std::sync::Arc;

use axum::{
    Extension, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};

use shelfmate_core::DomainError;

use crate::app::{
    dto::ChangePasswordRequest,
    errors::ApiError,
    extract::ValidJson,
    response::json_ok,
    services::AppServices,
};
use crate::context::Caller;

pub const WRONG_PASSWORD_MESSAGE: &str = "Current password is incorrect";

pub fn router() -> Router {
    Router::new()
        .route("/me", get(me))
        .route("/me/password", put(change_password))
}

/// GET /users/me
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(identity): Caller,
) -> Result<Response, ApiError> {
    // A valid token whose account has since vanished proves nothing.
    let user = services
        .users
        .get(identity.account_id)
        .await?
        .ok_or_else(DomainError::unauthenticated)?;
    json_ok(StatusCode::OK, &user)
}

/// PUT /users/me/password
pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(identity): Caller,
    ValidJson(body): ValidJson<ChangePasswordRequest>,
) -> Result<Response, ApiError> {
    let confirmed = services
        .authenticator
        .confirm_password(identity.account_id, &body.password)
        .await?;
    if !confirmed {
        return Err(DomainError::forbidden(WRONG_PASSWORD_MESSAGE).into());
    }

    let hashed = services.hash_password(&body.new_password).await?;
    if !services
        .users
        .update_password(identity.account_id, hashed)
        .await?
    {
        return Err(DomainError::unauthenticated().into());
    }

    tracing::info!(account_id = %identity.account_id, "password changed");
    Ok(StatusCode::NO_CONTENT.into_response())
}
