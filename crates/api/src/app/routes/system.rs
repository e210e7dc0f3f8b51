use axum::http::{Method, StatusCode, Uri};
use axum::response::Response;
use serde_json::json;

use shelfmate_core::DomainError;

use crate::app::errors::ApiError;
use crate::app::response::json_response;

pub async fn health() -> Response {
    json_response(StatusCode::OK, json!({ "status": "ok" }))
}

/// Router fallback: unknown paths are reported like any missing record.
pub async fn route_not_found(uri: Uri) -> ApiError {
    DomainError::not_found("Route", uri.path()).into()
}

/// A known path under a method it does not serve: that method/path pair is not a route.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    DomainError::not_found("Route", format!("{method} {}", uri.path())).into()
}
