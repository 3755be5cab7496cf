//! `SourceHub`: one store per source, plus a merged change stream.

use tracing::info;

use crate::errors::SourceClosed;
use crate::identity::{OrganizationId, UserIdentity};
use crate::snapshot::SourceSnapshot;
use crate::source::SourceReceiver;

use super::auth::{AuthSnapshot, AuthStore, SubscriptionStatus};
use super::organization::{OrganizationSnapshot, OrganizationStore};
use super::role::RoleStore;
use super::section_access::{SectionAccess, SectionAccessStore};
use crate::role::Role;

/// Owns the writer side of every source the gates read.
#[derive(Debug, Default)]
pub struct SourceHub {
    pub auth: AuthStore,
    pub organization: OrganizationStore,
    pub sections: SectionAccessStore,
    pub roles: RoleStore,
}

impl SourceHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current value of every source.
    pub fn snapshot(&self) -> SourceSnapshot {
        SourceSnapshot {
            auth: self.auth.session(),
            subscription: self.auth.subscription(),
            organization: self.organization.snapshot(),
            sections: self.sections.snapshot(),
            role: self.roles.snapshot(),
        }
    }

    pub fn changes(&self) -> HubChanges {
        HubChanges {
            auth: self.auth.subscribe_session(),
            subscription: self.auth.subscribe_subscription(),
            organization: self.organization.subscribe(),
            sections: self.sections.subscribe(),
            role: self.roles.subscribe(),
        }
    }

    /// Switch organizations. The role belongs to the old organization, so it
    /// is cleared before the new organization becomes visible.
    pub fn switch_organization(&self, organization_id: OrganizationId) {
        self.roles.clear();
        self.organization.switch_to(organization_id);
    }

    /// Sign `user` in. A different identity drops the previous user's role,
    /// section table and organization before the new session is published,
    /// so no gate sees the new user paired with the old user's data.
    pub fn sign_in(&self, user: UserIdentity) {
        let same_user = self
            .auth
            .session()
            .as_loaded()
            .and_then(|s| s.user_id().cloned())
            .is_some_and(|id| id == user.id);
        if !same_user {
            self.roles.clear();
            self.sections.clear();
            self.organization.clear();
        }
        self.auth.sign_in(user);
    }

    /// Sign out and drop every per-user source.
    pub fn sign_out(&self) {
        self.roles.clear();
        self.sections.clear();
        self.organization.clear();
        self.auth.sign_out();
        info!("all sources reset after sign-out");
    }
}

/// Readers for every source in a [`SourceHub`].
#[derive(Debug, Clone)]
pub struct HubChanges {
    auth: SourceReceiver<AuthSnapshot>,
    subscription: SourceReceiver<SubscriptionStatus>,
    organization: SourceReceiver<OrganizationSnapshot>,
    sections: SourceReceiver<SectionAccess>,
    role: SourceReceiver<Option<Role>>,
}

impl HubChanges {
    /// Current value of every source, marking each as seen.
    pub fn snapshot(&mut self) -> SourceSnapshot {
        SourceSnapshot {
            auth: self.auth.current(),
            subscription: self.subscription.current(),
            organization: self.organization.current(),
            sections: self.sections.current(),
            role: self.role.current(),
        }
    }

    /// Wait for any source to publish. Fails once any writer is gone.
    pub async fn changed(&mut self) -> Result<(), SourceClosed> {
        tokio::select! {
            r = self.auth.changed() => r,
            r = self.subscription.changed() => r,
            r = self.organization.changed() => r,
            r = self.sections.changed() => r,
            r = self.role.changed() => r,
        }
    }
}
