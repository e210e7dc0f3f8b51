//! Public book catalog.

use std::sync::Arc;

use axum::{
    Extension, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use shelfmate_core::{BookId, DomainError};

use crate::app::{
    dto::{BookCreate, BookQuery, BookUpdate},
    errors::ApiError,
    extract::{IdPath, ValidJson, ValidQuery},
    response::json_ok,
    services::AppServices,
};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/:book_id",
            get(show_book)
                .put(update_book)
                .patch(update_book)
                .delete(delete_book),
        )
}

/// GET /books?category=&author=
pub async fn list_books(
    Extension(services): Extension<Arc<AppServices>>,
    ValidQuery(query): ValidQuery<BookQuery>,
) -> Result<Response, ApiError> {
    let books = services.books.list(&query.into()).await?;
    json_ok(StatusCode::OK, &books)
}

/// GET /books/:book_id
pub async fn show_book(
    Extension(services): Extension<Arc<AppServices>>,
    IdPath(id): IdPath<BookId>,
) -> Result<Response, ApiError> {
    let book = services
        .books
        .get(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Book", id))?;
    json_ok(StatusCode::OK, &book)
}

/// POST /books
pub async fn create_book(
    Extension(services): Extension<Arc<AppServices>>,
    ValidJson(body): ValidJson<BookCreate>,
) -> Result<Response, ApiError> {
    let book = services.books.insert(body.into()).await?;
    json_ok(StatusCode::CREATED, &book)
}

/// PUT|PATCH /books/:book_id
pub async fn update_book(
    Extension(services): Extension<Arc<AppServices>>,
    IdPath(id): IdPath<BookId>,
    ValidJson(body): ValidJson<BookUpdate>,
) -> Result<Response, ApiError> {
    let book = services
        .books
        .update(id, body.into())
        .await?
        .ok_or_else(|| DomainError::not_found("Book", id))?;
    json_ok(StatusCode::OK, &book)
}

/// DELETE /books/:book_id
pub async fn delete_book(
    Extension(services): Extension<Arc<AppServices>>,
    IdPath(id): IdPath<BookId>,
) -> Result<Response, ApiError> {
    if !services.books.delete(id).await? {
        return Err(DomainError::not_found("Book", id).into());
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}
