use axum::{Router, routing::get};

pub mod admin;
pub mod auth;
pub mod books;
pub mod system;
pub mod todos;
pub mod users;

/// Routes reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/auth", auth::router())
        .nest("/books", books::router())
}

/// Routes behind the auth middleware.
pub fn protected_router() -> Router {
    Router::new()
        .nest("/users", users::router())
        .nest("/todos", todos::router())
        .nest("/admin", admin::router())
}
