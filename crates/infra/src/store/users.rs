use async_trait::async_trait;
use serde::Serialize;

use shelfmate_auth::{CredentialStore, Role, StoredCredential};
use shelfmate_core::{AccountId, StoreError, StoreResult};

use super::SerialTable;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: AccountId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
}

impl User {
    pub fn credential(&self) -> StoredCredential {
        StoredCredential {
            subject: self.username.clone(),
            account_id: self.id,
            role: self.role.clone(),
            password_hash: self.hashed_password.clone(),
            is_active: self.is_active,
        }
    }
}

/// Registration input; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub hashed_password: String,
}

/// Account persistence port.
#[async_trait]
pub trait UserStore: CredentialStore {
    /// Fails with [`StoreError::Conflict`] when the username or email is taken.
    async fn create(&self, user: NewUser) -> StoreResult<User>;
    async fn get(&self, id: AccountId) -> StoreResult<Option<User>>;
    /// `Ok(false)` when no such account exists.
    async fn update_password(&self, id: AccountId, hashed_password: String) -> StoreResult<bool>;
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    table: SerialTable<User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryUserStore {
    async fn find_credential(&self, subject: &str) -> StoreResult<Option<StoredCredential>> {
        Ok(self
            .table
            .find(|u| u.username == subject)?
            .map(|u| u.credential()))
    }

    async fn find_account(&self, account_id: AccountId) -> StoreResult<Option<StoredCredential>> {
        Ok(self.table.get(account_id.get())?.map(|u| u.credential()))
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let created = self.table.insert_with(
            |existing| {
                for u in existing {
                    if u.username == user.username {
                        return Err(StoreError::Conflict("Username has already been taken".into()));
                    }
                    if u.email.eq_ignore_ascii_case(&user.email) {
                        return Err(StoreError::Conflict("Email has already been taken".into()));
                    }
                }
                Ok(())
            },
            |id| User {
                id: AccountId::new(id),
                email: user.email.clone(),
                username: user.username.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                role: user.role.clone(),
                hashed_password: user.hashed_password.clone(),
                is_active: true,
            },
        )?;
        tracing::info!(account_id = %created.id, role = %created.role, "account created");
        Ok(created)
    }

    async fn get(&self, id: AccountId) -> StoreResult<Option<User>> {
        self.table.get(id.get())
    }

    async fn update_password(&self, id: AccountId, hashed_password: String) -> StoreResult<bool> {
        let updated = self
            .table
            .update(id.get(), |_| true, |u| u.hashed_password = hashed_password)?;
        Ok(updated.is_some())
    }
}
