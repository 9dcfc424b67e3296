//! User roles and per-endpoint role allow-lists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// The fixed set of roles a user can hold.
///
/// Stored in PostgreSQL as the `user_role` enum and serialized as
/// `SCREAMING_SNAKE_CASE` both in JSON bodies and in token claims.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
    SuperAdmin,
    Ceo,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::User, Role::SuperAdmin, Role::Ceo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Ceo => "CEO",
        }
    }

    /// Platform staff bypass ownership checks.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleParseError {
    #[error("unknown role: {0}")]
    Unknown(String),
    #[error("role list must not be empty")]
    Empty,
}

impl FromStr for Role {
    type Err = RoleParseError;

    /// Role names are matched exactly (`"SUPER_ADMIN"`, not `"super_admin"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| RoleParseError::Unknown(s.to_string()))
    }
}

/// An immutable allow-list of roles, attached to a route when it is registered.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn of<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        Self(roles.into_iter().fold(0, |bits, role| bits | role.bit()))
    }

    /// Every authenticated user.
    pub fn all() -> Self {
        Self::of(Role::ALL)
    }

    /// ADMIN and SUPER_ADMIN.
    pub fn staff() -> Self {
        Self::of([Role::Admin, Role::SuperAdmin])
    }

    /// Roles that may run learning centers: CEO plus staff.
    pub fn center_managers() -> Self {
        Self::of([Role::Ceo, Role::Admin, Role::SuperAdmin])
    }

    /// Builds a set from role names, failing on a typo or an empty list.
    pub fn try_from_names<I, S>(names: I) -> Result<Self, RoleParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        for name in names {
            set = set.with(name.as_ref().parse()?);
        }
        if set.is_empty() {
            return Err(RoleParseError::Empty);
        }
        Ok(set)
    }

    #[must_use]
    pub fn with(self, role: Role) -> Self {
        Self(self.0 | role.bit())
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|role| self.contains(*role))
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self::of(iter)
    }
}
