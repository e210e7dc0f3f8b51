//! Strongly-typed record identifiers.
//!
//! Records are addressed by positive integers (database-style serial keys).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of an account (the numeric half of an identity).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i64);

/// Identifier of a todo item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

/// Identifier of a catalog book.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(i64);

macro_rules! impl_serial_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }

            /// The identifier that follows this one in a serial sequence.
            pub const fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = i64::from_str(s)
                    .map_err(|e| DomainError::malformed(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_serial_newtype!(AccountId, "AccountId");
impl_serial_newtype!(TodoId, "TodoId");
impl_serial_newtype!(BookId, "BookId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_round_trip() {
        let id: TodoId = "17".parse().unwrap();
        assert_eq!(id, TodoId::new(17));
        assert_eq!(id.to_string(), "17");
    }

    #[test]
    fn rejects_non_numeric_input() {
        let err = "abc".parse::<BookId>().unwrap_err();
        assert!(matches!(err, DomainError::MalformedInput(msg) if msg.starts_with("BookId")));
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_value(AccountId::new(3)).unwrap();
        assert_eq!(json, serde_json::json!(3));
    }
}
