//! Owner-scoped todo CRUD. Another account's todo is reported as not found.

use std::sync::Arc;

use axum::{
    Extension, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use shelfmate_core::{DomainError, TodoId};

use crate::app::{
    dto::TodoRequest,
    errors::ApiError,
    extract::{IdPath, ValidJson},
    response::json_ok,
    services::AppServices,
};
use crate::context::Caller;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/:todo_id", get(get_todo).put(update_todo).delete(delete_todo))
}

/// GET /todos
pub async fn list_todos(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(identity): Caller,
) -> Result<Response, ApiError> {
    let todos = services.todos.list_owned(identity.account_id).await?;
    json_ok(StatusCode::OK, &todos)
}

/// GET /todos/:todo_id
pub async fn get_todo(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(identity): Caller,
    IdPath(id): IdPath<TodoId>,
) -> Result<Response, ApiError> {
    let todo = services
        .todos
        .get_owned(id, identity.account_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Todo", id))?;
    json_ok(StatusCode::OK, &todo)
}

/// POST /todos
pub async fn create_todo(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(identity): Caller,
    ValidJson(body): ValidJson<TodoRequest>,
) -> Result<Response, ApiError> {
    let todo = services
        .todos
        .insert(identity.account_id, body.into())
        .await?;
    json_ok(StatusCode::CREATED, &todo)
}

/// PUT /todos/:todo_id
pub async fn update_todo(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(identity): Caller,
    IdPath(id): IdPath<TodoId>,
    ValidJson(body): ValidJson<TodoRequest>,
) -> Result<Response, ApiError> {
    let todo = services
        .todos
        .replace_owned(id, identity.account_id, body.into())
        .await?
        .ok_or_else(|| DomainError::not_found("Todo", id))?;
    json_ok(StatusCode::OK, &todo)
}

/// DELETE /todos/:todo_id
pub async fn delete_todo(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(identity): Caller,
    IdPath(id): IdPath<TodoId>,
) -> Result<Response, ApiError> {
    if !services.todos.delete_owned(id, identity.account_id).await? {
        return Err(DomainError::not_found("Todo", id).into());
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}
