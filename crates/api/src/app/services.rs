//! Service wiring: stores, password hashing, and token signing shared by all handlers.

use std::sync::Arc;

use thiserror::Error;

use shelfmate_auth::{AuthConfig, Authenticator, PasswordError, PasswordService, TokenService};
use shelfmate_core::StoreError;
use shelfmate_infra::{
    BookStore, InMemoryBookStore, InMemoryTodoStore, InMemoryUserStore, TodoStore, UserStore,
};

use crate::app::errors::ApiError;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("password hasher: {0}")]
    Password(#[from] PasswordError),

    #[error("seeding stores: {0}")]
    Store(#[from] StoreError),
}

/// Everything a handler needs, shared behind one `Arc`.
pub struct AppServices {
    pub authenticator: Authenticator,
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
    pub books: Arc<dyn BookStore>,
}

impl AppServices {
    /// Hash a new password on the blocking pool.
    pub async fn hash_password(&self, plaintext: &str) -> Result<String, ApiError> {
        let passwords = self.authenticator.passwords().clone();
        let plaintext = plaintext.to_owned();
        let hashed = tokio::task::spawn_blocking(move || passwords.hash_password(&plaintext))
            .await
            .map_err(ApiError::unexpected)??;
        Ok(hashed)
    }
}

/// Build in-memory services (books seeded with the sample catalog).
pub fn build_services(config: &AuthConfig) -> Result<AppServices, BuildError> {
    let users = Arc::new(InMemoryUserStore::new());
    let passwords = PasswordService::new(config.hashing)?;
    let authenticator = Authenticator::new(users.clone(), passwords)?;

    Ok(AppServices {
        authenticator,
        tokens: Arc::new(TokenService::new(config)),
        users,
        todos: Arc::new(InMemoryTodoStore::new()),
        books: Arc::new(InMemoryBookStore::seeded()?),
    })
}
