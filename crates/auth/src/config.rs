//! Token and password-hashing settings.
//!
//! Built once at startup and shared read-only for the life of the process.

use core::str::FromStr;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthConfigError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("unsupported signing algorithm '{0}' (expected HS256, HS384 or HS512)")]
    UnsupportedAlgorithm(String),

    #[error("token ttl must be between 1 and {max} minutes, got {0}", max = MAX_TTL_MINUTES)]
    InvalidTtl(i64),
}

/// Longest accepted token lifetime (one year).
pub const MAX_TTL_MINUTES: i64 = 366 * 24 * 60;

/// Argon2id cost parameters.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HashParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashParams {
    /// OWASP-recommended Argon2id baseline: 19 MiB, 2 passes, 1 lane.
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    secret: Vec<u8>,
    algorithm: Algorithm,
    ttl: Duration,
    pub hashing: HashParams,
}

impl AuthConfig {
    /// Validate raw settings.
    ///
    /// Only the HMAC family is accepted since tokens are signed and verified
    /// with the same shared secret.
    pub fn new(
        secret: impl Into<Vec<u8>>,
        algorithm: &str,
        ttl_minutes: i64,
    ) -> Result<Self, AuthConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AuthConfigError::EmptySecret);
        }

        let algorithm = match Algorithm::from_str(algorithm) {
            Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => alg,
            _ => return Err(AuthConfigError::UnsupportedAlgorithm(algorithm.to_string())),
        };

        let ttl = Some(ttl_minutes)
            .filter(|m| (1..=MAX_TTL_MINUTES).contains(m))
            .and_then(Duration::try_minutes)
            .ok_or(AuthConfigError::InvalidTtl(ttl_minutes))?;

        Ok(Self {
            secret,
            algorithm,
            ttl,
            hashing: HashParams::default(),
        })
    }

    pub fn with_hashing(mut self, hashing: HashParams) -> Self {
        self.hashing = hashing;
        self
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("ttl", &self.ttl)
            .field("hashing", &self.hashing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hmac_algorithms() {
        for name in ["HS256", "HS384", "HS512"] {
            let cfg = AuthConfig::new("secret", name, 30).unwrap();
            assert_eq!(format!("{:?}", cfg.algorithm()), name);
        }
    }

    #[test]
    fn rejects_asymmetric_and_unknown_algorithms() {
        for name in ["RS256", "ES256", "none", "hs256"] {
            assert_eq!(
                AuthConfig::new("secret", name, 30).unwrap_err(),
                AuthConfigError::UnsupportedAlgorithm(name.to_string())
            );
        }
    }

    #[test]
    fn rejects_empty_secret_and_non_positive_ttl() {
        assert_eq!(
            AuthConfig::new("", "HS256", 30).unwrap_err(),
            AuthConfigError::EmptySecret
        );
        assert_eq!(
            AuthConfig::new("s", "HS256", 0).unwrap_err(),
            AuthConfigError::InvalidTtl(0)
        );
    }

    #[test]
    fn rejects_ttl_beyond_a_year() {
        assert!(AuthConfig::new("s", "HS256", MAX_TTL_MINUTES).is_ok());
        for minutes in [MAX_TTL_MINUTES + 1, 1_000_000_000_000, i64::MAX] {
            assert_eq!(
                AuthConfig::new("s", "HS256", minutes).unwrap_err(),
                AuthConfigError::InvalidTtl(minutes)
            );
        }
    }

    #[test]
    fn debug_output_hides_secret() {
        let cfg = AuthConfig::new("super-secret-value", "HS256", 30).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("<redacted>"));
    }
}
