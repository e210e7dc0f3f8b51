use serde::{Deserialize, Serialize};

use shelfmate_core::AccountId;

use crate::Role;

/// The resolved caller of a request.
///
/// Built from a verified token (or a successful login) and dropped with the
/// request. It is never persisted and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Username, unique per account.
    pub subject: String,
    pub account_id: AccountId,
    pub role: Role,
}

impl Identity {
    pub fn new(subject: impl Into<String>, account_id: AccountId, role: Role) -> Self {
        Self {
            subject: subject.into(),
            account_id,
            role,
        }
    }
}
