//! Signed access tokens (JWT, HMAC).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;

use crate::{AuthConfig, ClaimsError, Identity, TokenClaims, validate_claims};

/// Why a token was refused. Kept for logs; callers only ever see [`TokenInvalid`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rejection {
    Malformed,
    BadSignature,
    AlgorithmMismatch,
    MissingClaim,
    Expired,
    NotYetValid,
    InvalidTimeWindow,
}

/// The single failure a token verification can produce.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid token")]
pub struct TokenInvalid {
    reason: Rejection,
}

impl TokenInvalid {
    pub fn reason(&self) -> Rejection {
        self.reason
    }
}

impl From<Rejection> for TokenInvalid {
    fn from(reason: Rejection) -> Self {
        Self { reason }
    }
}

impl From<ClaimsError> for TokenInvalid {
    fn from(value: ClaimsError) -> Self {
        let reason = match value {
            ClaimsError::Expired => Rejection::Expired,
            ClaimsError::NotYetValid => Rejection::NotYetValid,
            ClaimsError::InvalidTimeWindow => Rejection::InvalidTimeWindow,
        };
        Self { reason }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenInvalid {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        let reason = match value.kind() {
            ErrorKind::InvalidSignature => Rejection::BadSignature,
            ErrorKind::InvalidAlgorithm => Rejection::AlgorithmMismatch,
            ErrorKind::MissingRequiredClaim(_) => Rejection::MissingClaim,
            ErrorKind::ExpiredSignature => Rejection::Expired,
            _ => Rejection::Malformed,
        };
        Self { reason }
    }
}

#[derive(Debug, Error)]
pub enum TokenIssueError {
    #[error("failed to sign access token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("token issued at {0} would expire past the representable range")]
    ExpiryOutOfRange(DateTime<Utc>),
}

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies access tokens with one shared secret.
///
/// Holds no mutable state; share it behind an `Arc`.
#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    ttl: Duration,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            algorithm: config.algorithm(),
            ttl: config.ttl(),
            encoding: EncodingKey::from_secret(config.secret()),
            decoding: DecodingKey::from_secret(config.secret()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, identity: &Identity) -> Result<AccessToken, TokenIssueError> {
        self.issue_at(identity, Utc::now())
    }

    /// Sign a token for `identity` valid from `now` for the configured ttl.
    pub fn issue_at(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, TokenIssueError> {
        let claims = TokenClaims::for_identity(identity, now, self.ttl)
            .ok_or(TokenIssueError::ExpiryOutOfRange(now))?;
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding)?;
        Ok(AccessToken {
            token,
            expires_at: claims.exp,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Identity, TokenInvalid> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature, algorithm, and claims; the time window is judged against `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenInvalid> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation())?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims.into_identity())
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked by `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
