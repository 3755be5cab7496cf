//! Point-in-time view of every source a gate may read.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::loadable::Loadable;
use crate::role::Role;
use crate::state::{AuthSnapshot, OrganizationSnapshot, SectionAccess, SubscriptionStatus};

/// The five sources a gate can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Auth,
    Organization,
    SectionAccess,
    Role,
    Subscription,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        Self::Auth,
        Self::Organization,
        Self::SectionAccess,
        Self::Role,
        Self::Subscription,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Organization => "organization",
            Self::SectionAccess => "section_access",
            Self::Role => "role",
            Self::Subscription => "subscription",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Auth => 1 << 0,
            Self::Organization => 1 << 1,
            Self::SectionAccess => 1 << 2,
            Self::Role => 1 << 3,
            Self::Subscription => 1 << 4,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subset of [`SourceKind`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SourceSet(u8);

impl SourceSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn of(kinds: &[SourceKind]) -> Self {
        kinds.iter().copied().fold(Self::empty(), Self::with)
    }

    pub fn with(self, kind: SourceKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub fn contains(&self, kind: SourceKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = SourceKind> + '_ {
        SourceKind::ALL.into_iter().filter(|k| self.contains(*k))
    }
}

/// Latest value of every source, captured together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceSnapshot {
    pub auth: Loadable<AuthSnapshot>,
    pub subscription: Loadable<SubscriptionStatus>,
    pub organization: Loadable<OrganizationSnapshot>,
    pub sections: Loadable<SectionAccess>,
    pub role: Loadable<Option<Role>>,
}

impl SourceSnapshot {
    pub fn is_loaded(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Auth => self.auth.is_loaded(),
            SourceKind::Organization => self.organization.is_loaded(),
            SourceKind::SectionAccess => self.sections.is_loaded(),
            SourceKind::Role => self.role.is_loaded(),
            SourceKind::Subscription => self.subscription.is_loaded(),
        }
    }

    /// Which of `required` have not reported a value yet.
    pub fn pending(&self, required: SourceSet) -> SourceSet {
        required
            .iter()
            .filter(|k| !self.is_loaded(*k))
            .fold(SourceSet::empty(), SourceSet::with)
    }
}
