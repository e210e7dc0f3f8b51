//! `shelfmate-core`: shared domain primitives.
//!
//! This crate contains the HTTP-agnostic error taxonomy, strongly-typed record
//! identifiers, and request validation helpers (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod validation;

pub use error::{Denial, DomainError, DomainResult, StoreError, StoreResult};
pub use id::{AccountId, BookId, TodoId};
pub use validation::{FieldErrors, FieldViolation, IntBounds, LengthBounds, Location, Validator};
