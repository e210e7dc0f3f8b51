//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: stores, password hashing, token signing
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request bodies and their field rules
//! - `extract.rs`: extractors that reject through the error dispatcher
//! - `errors.rs`: the error dispatcher
//! - `response.rs`: timestamped JSON responses

use std::any::Any;
use std::sync::Arc;

use axum::{Extension, Router, response::IntoResponse, response::Response};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod response;
pub mod routes;
pub mod services;

pub use services::BuildError;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> Result<Router, BuildError> {
    let services = Arc::new(services::build_services(&config.auth)?);
    Ok(router(services))
}

/// Router over already-built services.
pub fn router(services: Arc<services::AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        tokens: Arc::clone(&services.tokens),
    };

    // Protected routes: the middleware only runs for paths that matched.
    let protected = routes::protected_router().route_layer(
        axum::middleware::from_fn_with_state(auth_state, middleware::auth_middleware),
    );

    Router::new()
        .merge(routes::public_router())
        .merge(protected)
        .method_not_allowed_fallback(routes::system::method_not_allowed)
        .fallback(routes::system::route_not_found)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    errors::ApiError::unexpected(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
