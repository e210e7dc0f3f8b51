//! Admin-only views across every account's todos.

use std::sync::Arc;

use axum::{
    Extension, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};

use shelfmate_core::{DomainError, TodoId};

use crate::app::{errors::ApiError, extract::IdPath, response::json_ok, services::AppServices};
use crate::authz::require_admin;
use crate::context::Caller;

pub fn router() -> Router {
    Router::new()
        .route("/todos", get(list_all_todos))
        .route("/todos/:todo_id", delete(delete_any_todo))
}

/// GET /admin/todos
pub async fn list_all_todos(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(identity): Caller,
) -> Result<Response, ApiError> {
    require_admin(&identity)?;
    let todos = services.todos.list_all().await?;
    json_ok(StatusCode::OK, &todos)
}

/// DELETE /admin/todos/:todo_id
pub async fn delete_any_todo(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(identity): Caller,
    IdPath(id): IdPath<TodoId>,
) -> Result<Response, ApiError> {
    require_admin(&identity)?;
    if !services.todos.delete_any(id).await? {
        return Err(DomainError::not_found("Todo", id).into());
    }
    tracing::info!(todo_id = %id, admin = %identity.subject, "todo deleted by admin");
    Ok(StatusCode::NO_CONTENT.into_response())
}
