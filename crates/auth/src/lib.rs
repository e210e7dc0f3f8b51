//! `shelfmate-auth`: credential verification, signed access tokens, and role checks.
//!
//! This crate is decoupled from HTTP and storage: credential
//! lookups go through the [`CredentialStore`] port and every result is a plain
//! Rust value the caller maps onto its own transport.

pub mod authorize;
pub mod claims;
pub mod config;
pub mod credentials;
pub mod identity;
pub mod password;
pub mod roles;
pub mod token;

pub use authorize::{AuthzError, authorize};
pub use claims::{ClaimsError, TokenClaims, validate_claims};
pub use config::{AuthConfig, AuthConfigError, HashParams, MAX_TTL_MINUTES};
pub use credentials::{AuthError, Authenticator, CredentialStore, StoredCredential};
pub use identity::Identity;
pub use password::{PasswordError, PasswordService};
pub use roles::Role;
pub use token::{AccessToken, Rejection, TokenInvalid, TokenIssueError, TokenService};
