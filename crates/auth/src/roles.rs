use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for authorization.
///
/// Roles are flat: there is no inheritance, so `admin` does not imply `user`.
/// The wire form is the bare role name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const USER: Role = Role(Cow::Borrowed("user"));
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));

    /// Roles accounts may be registered with.
    pub const KNOWN: [Role; 2] = [Role::USER, Role::ADMIN];

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Resolve a name against [`Role::KNOWN`].
    pub fn known(name: &str) -> Option<Role> {
        Self::KNOWN.into_iter().find(|r| r.as_str() == name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_resolve_exactly() {
        assert_eq!(Role::known("admin"), Some(Role::ADMIN));
        assert_eq!(Role::known("user"), Some(Role::USER));
        assert_eq!(Role::known("Admin"), None);
        assert_eq!(Role::known("root"), None);
    }

    #[test]
    fn borrowed_and_owned_names_compare_equal() {
        assert_eq!(Role::new(String::from("admin")), Role::ADMIN);
    }
}
