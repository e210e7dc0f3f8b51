use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

use crate::HashParams;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("invalid argon2 parameters: {0}")]
    InvalidParams(String),

    #[error("password hashing failed: {0}")]
    HashFailed(String),

    #[error("stored password hash is unreadable: {0}")]
    CorruptHash(String),
}

/// One-way password hashing (Argon2id, random salt, PHC string output).
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new(params: HashParams) -> Result<Self, PasswordError> {
        let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash_password(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashFailed(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// `Ok(false)` on mismatch; `Err` only when `hash` cannot be parsed.
    ///
    /// The cost parameters embedded in `hash` win over the ones this service
    /// was built with, so hashes from older settings keep verifying.
    pub fn verify_password(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::CorruptHash(e.to_string()))?;
        Ok(self
            .argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::new(HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn hash_and_verify_correct_password() {
        let svc = service();
        let hashed = svc.hash_password("my-secure-password").unwrap();
        assert!(svc.verify_password("my-secure-password", &hashed).unwrap());
    }

    #[test]
    fn verify_wrong_password() {
        let svc = service();
        let hashed = svc.hash_password("correct-password").unwrap();
        assert!(!svc.verify_password("wrong-password", &hashed).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        let svc = service();
        let a = svc.hash_password("same-password").unwrap();
        let b = svc.hash_password("same-password").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
    }

    #[test]
    fn unreadable_hash_is_an_error_not_a_mismatch() {
        let err = service().verify_password("pw", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, PasswordError::CorruptHash(_)));
    }

    #[test]
    fn rejects_impossible_params() {
        let err = PasswordService::new(HashParams {
            memory_kib: 1,
            iterations: 1,
            parallelism: 1,
        })
        .err()
        .unwrap();
        assert!(matches!(err, PasswordError::InvalidParams(_)));
    }
}
