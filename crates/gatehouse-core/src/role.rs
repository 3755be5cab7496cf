//! Organization roles and role allow-sets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A member's role within the current organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Member,
}

impl Role {
    pub const ALL: [Role; 3] = [Self::Owner, Self::Admin, Self::Member];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Parse a role name as stored in the membership table.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "owner" => Some(Self::Owner),
            "admin" => Some(Self::Admin),
            "member" => Some(Self::Member),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Owner => 0b001,
            Self::Admin => 0b010,
            Self::Member => 0b100,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of roles allowed through a role gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Owner, admin, and member.
    pub fn all() -> Self {
        Role::ALL.into_iter().collect()
    }

    /// Owner and admin.
    pub fn managers() -> Self {
        [Role::Owner, Role::Admin].into_iter().collect()
    }

    pub fn with(mut self, role: Role) -> Self {
        self.insert(role);
        self
    }

    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|r| self.contains(*r))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = Self::empty();
        for role in iter {
            set.insert(role);
        }
        set
    }
}
