use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shelfmate_core::AccountId;

use crate::{Identity, Role};

/// Access-token claims.
///
/// Timestamps travel as whole seconds since the Unix epoch (`iat` / `exp`
/// registered claim names), so anything finer than a second is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (username).
    pub sub: String,

    /// Numeric account reference.
    pub id: AccountId,

    pub role: Role,

    /// Issued-at timestamp.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

impl TokenClaims {
    /// `None` when `issued_at + ttl` falls outside the representable range.
    pub fn for_identity(
        identity: &Identity,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        Some(Self {
            sub: identity.subject.clone(),
            id: identity.account_id,
            role: identity.role.clone(),
            iat: issued_at,
            exp: issued_at.checked_add_signed(ttl)?,
        })
    }

    pub fn into_identity(self) -> Identity {
        Identity {
            subject: self.sub,
            account_id: self.id,
            role: self.role,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate token claims against `now`.
///
/// There is no leeway: a token is dead from the second its `exp` is reached.
/// Signature verification happens before this in [`crate::TokenService`].
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), ClaimsError> {
    if claims.exp <= claims.iat {
        return Err(ClaimsError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(ClaimsError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(ClaimsError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn claims_at(iat: DateTime<Utc>, ttl_minutes: i64) -> TokenClaims {
        let identity = Identity::new("alice", AccountId::new(1), Role::USER);
        TokenClaims::for_identity(&identity, iat, Duration::minutes(ttl_minutes)).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn valid_inside_window() {
        let claims = claims_at(t0(), 30);
        assert_eq!(validate_claims(&claims, t0()), Ok(()));
        assert_eq!(validate_claims(&claims, t0() + Duration::minutes(29)), Ok(()));
    }

    #[test]
    fn expired_exactly_at_exp_and_after() {
        let claims = claims_at(t0(), 30);
        assert_eq!(
            validate_claims(&claims, t0() + Duration::minutes(30)),
            Err(ClaimsError::Expired)
        );
        assert_eq!(
            validate_claims(&claims, t0() + Duration::days(1)),
            Err(ClaimsError::Expired)
        );
    }

    #[test]
    fn issued_in_future_is_rejected() {
        let claims = claims_at(t0(), 30);
        assert_eq!(
            validate_claims(&claims, t0() - Duration::seconds(1)),
            Err(ClaimsError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        let claims = claims_at(t0(), 0);
        assert_eq!(validate_claims(&claims, t0()), Err(ClaimsError::InvalidTimeWindow));
    }

    #[test]
    fn expiry_past_the_calendar_end_is_refused() {
        let identity = Identity::new("alice", AccountId::new(1), Role::USER);
        let late = DateTime::<Utc>::MAX_UTC - Duration::minutes(1);
        assert!(TokenClaims::for_identity(&identity, late, Duration::minutes(30)).is_none());
    }

    #[test]
    fn wire_form_uses_epoch_seconds() {
        let claims = claims_at(t0(), 1);
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "alice");
        assert_eq!(json["id"], 1);
        assert_eq!(json["role"], "user");
        assert_eq!(json["iat"], t0().timestamp());
        assert_eq!(json["exp"], t0().timestamp() + 60);
    }
}
