//! Readiness composer: auth + organization → `{is_ready, is_loading}`.
//!
//! Every gate that needs "signed in with an organization" asks this type
//! instead of inspecting the two sources itself.

use crate::identity::{OrganizationId, UserIdentity};
use crate::loadable::Loadable;
use crate::state::{AuthSnapshot, OrganizationSnapshot};

/// Derived readiness of the auth and organization sources.
///
/// Pure and stateless. `is_loading` is true while auth has not reported or the
/// organization source has not initialized; `is_ready` additionally requires a
/// user and an organization ID.
#[derive(Debug, Clone, Copy)]
pub struct Readiness<'a> {
    auth: &'a Loadable<AuthSnapshot>,
    organization: &'a Loadable<OrganizationSnapshot>,
}

impl<'a> Readiness<'a> {
    pub fn compose(
        auth: &'a Loadable<AuthSnapshot>,
        organization: &'a Loadable<OrganizationSnapshot>,
    ) -> Self {
        Self { auth, organization }
    }

    pub fn is_loading(&self) -> bool {
        self.auth.is_pending() || self.organization.is_pending()
    }

    pub fn is_ready(&self) -> bool {
        !self.is_loading() && self.user().is_some() && self.organization_id().is_some()
    }

    /// Whether auth has reported, regardless of the organization.
    pub fn auth_resolved(&self) -> bool {
        self.auth.is_loaded()
    }

    pub fn user(&self) -> Option<&'a UserIdentity> {
        self.auth.as_loaded().and_then(|a| a.user.as_ref())
    }

    pub fn organization_id(&self) -> Option<&'a OrganizationId> {
        self.organization
            .as_loaded()
            .and_then(|o| o.organization_id.as_ref())
    }
}
