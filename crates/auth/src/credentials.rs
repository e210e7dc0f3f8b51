//! Username/password authentication against a credential store.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use shelfmate_core::{AccountId, StoreError, StoreResult};

use crate::{Identity, PasswordError, PasswordService, Role};

/// Credential record as kept by the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub subject: String,
    pub account_id: AccountId,
    pub role: Role,
    pub password_hash: String,
    pub is_active: bool,
}

impl StoredCredential {
    pub fn identity(&self) -> Identity {
        Identity::new(self.subject.clone(), self.account_id, self.role.clone())
    }
}

/// Read-side persistence port used by authentication.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_credential(&self, subject: &str) -> StoreResult<Option<StoredCredential>>;
    async fn find_account(&self, account_id: AccountId) -> StoreResult<Option<StoredCredential>>;
}

#[async_trait]
impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    async fn find_credential(&self, subject: &str) -> StoreResult<Option<StoredCredential>> {
        (**self).find_credential(subject).await
    }

    async fn find_account(&self, account_id: AccountId) -> StoreResult<Option<StoredCredential>> {
        (**self).find_account(account_id).await
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown subject, inactive account, or wrong password. Deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("password verification task failed: {0}")]
    Worker(String),
}

/// Verifies passwords and resolves identities.
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    passwords: PasswordService,
    // Verified against when the subject is unknown so both failure paths do the same work.
    decoy_hash: Arc<str>,
}

impl Authenticator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        passwords: PasswordService,
    ) -> Result<Self, PasswordError> {
        let decoy_hash = passwords.hash_password("decoy-password-never-matches")?;
        Ok(Self {
            store,
            passwords,
            decoy_hash: decoy_hash.into(),
        })
    }

    pub fn passwords(&self) -> &PasswordService {
        &self.passwords
    }

    pub async fn authenticate(&self, subject: &str, password: &str) -> Result<Identity, AuthError> {
        let credential = self.store.find_credential(subject).await?;

        let hash: Arc<str> = match &credential {
            Some(c) => c.password_hash.as_str().into(),
            None => Arc::clone(&self.decoy_hash),
        };
        let matches = self.verify_off_thread(password, hash).await?;

        match credential {
            Some(c) if matches && c.is_active => Ok(c.identity()),
            _ => {
                tracing::debug!(subject, "authentication rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Check `password` against the stored hash of an already-identified account.
    pub async fn confirm_password(
        &self,
        account_id: AccountId,
        password: &str,
    ) -> Result<bool, AuthError> {
        let Some(credential) = self.store.find_account(account_id).await? else {
            return Ok(false);
        };
        self.verify_off_thread(password, credential.password_hash.into())
            .await
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    async fn verify_off_thread(&self, password: &str, hash: Arc<str>) -> Result<bool, AuthError> {
        let passwords = self.passwords.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || passwords.verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Worker(e.to_string()))?
            .map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::HashParams;

    struct FakeStore {
        by_subject: HashMap<String, StoredCredential>,
        fail: bool,
    }

    #[async_trait]
    impl CredentialStore for FakeStore {
        async fn find_credential(&self, subject: &str) -> StoreResult<Option<StoredCredential>> {
            if self.fail {
                return Err(StoreError::Unavailable("connection refused".into()));
            }
            Ok(self.by_subject.get(subject).cloned())
        }

        async fn find_account(&self, account_id: AccountId) -> StoreResult<Option<StoredCredential>> {
            Ok(self
                .by_subject
                .values()
                .find(|c| c.account_id == account_id)
                .cloned())
        }
    }

    fn passwords() -> PasswordService {
        PasswordService::new(HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    fn authenticator(fail: bool) -> Authenticator {
        let pw = passwords();
        let mut by_subject = HashMap::new();
        for (subject, id, role, active) in [
            ("alice", 1, Role::USER, true),
            ("root", 2, Role::ADMIN, true),
            ("mallory", 3, Role::USER, false),
        ] {
            by_subject.insert(
                subject.to_string(),
                StoredCredential {
                    subject: subject.to_string(),
                    account_id: AccountId::new(id),
                    role,
                    password_hash: pw.hash_password("correct horse").unwrap(),
                    is_active: active,
                },
            );
        }
        Authenticator::new(Arc::new(FakeStore { by_subject, fail }), pw).unwrap()
    }

    #[tokio::test]
    async fn valid_credentials_resolve_stored_identity() {
        let auth = authenticator(false);
        let identity = auth.authenticate("root", "correct horse").await.unwrap();
        assert_eq!(identity, Identity::new("root", AccountId::new(2), Role::ADMIN));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_fail_the_same_way() {
        let auth = authenticator(false);
        let wrong = auth.authenticate("alice", "battery staple").await.unwrap_err();
        let unknown = auth.authenticate("bob", "correct horse").await.unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn inactive_account_cannot_log_in() {
        let auth = authenticator(false);
        let err = auth.authenticate("mallory", "correct horse").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn store_outage_propagates_without_retry() {
        let auth = authenticator(true);
        let err = auth.authenticate("alice", "correct horse").await.unwrap_err();
        assert!(matches!(err, AuthError::Store(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn confirm_password_checks_account_hash() {
        let auth = authenticator(false);
        assert!(auth.confirm_password(AccountId::new(1), "correct horse").await.unwrap());
        assert!(!auth.confirm_password(AccountId::new(1), "nope").await.unwrap());
        assert!(!auth.confirm_password(AccountId::new(99), "correct horse").await.unwrap());
    }
}
