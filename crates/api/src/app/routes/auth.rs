//! Registration and login.

use std::sync::Arc;

use axum::{
    Extension, Router,
    http::StatusCode,
    response::Response,
    routing::post,
};

use shelfmate_infra::store::NewUser;

use crate::app::{
    dto::{LoginRequest, RegisterRequest, TokenResponse},
    errors::ApiError,
    extract::ValidJson,
    response::json_ok,
    services::AppServices,
};

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// POST /auth/register
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    ValidJson(body): ValidJson<RegisterRequest>,
) -> Result<Response, ApiError> {
    let hashed_password = services.hash_password(&body.password).await?;

    let user = services
        .users
        .create(NewUser {
            email: body.email,
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            role: body.role,
            hashed_password,
        })
        .await?;

    json_ok(StatusCode::CREATED, &user)
}

/// POST /auth/login
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let identity = services
        .authenticator
        .authenticate(&body.username, &body.password)
        .await?;
    let token = services.tokens.issue(&identity)?;

    tracing::info!(subject = %identity.subject, expires_at = %token.expires_at, "token issued");
    json_ok(
        StatusCode::OK,
        &TokenResponse {
            access_token: token.token,
            token_type: "bearer",
        },
    )
}
