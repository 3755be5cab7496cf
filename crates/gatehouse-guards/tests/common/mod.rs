//! Shared fixtures for gate tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gatehouse_core::{
    AuthSnapshot, Loadable, LookupError, OrganizationId, OrganizationSnapshot, Role,
    SectionAccess, SourceSnapshot, SubscriptionStatus, UserId, UserIdentity,
};
use gatehouse_guards::RoleAssignmentLookup;
use tokio::sync::Notify;

pub fn signed_out() -> SourceSnapshot {
    SourceSnapshot {
        auth: Loadable::Loaded(AuthSnapshot::signed_out()),
        ..SourceSnapshot::default()
    }
}

pub fn signed_in(user: &str) -> SourceSnapshot {
    SourceSnapshot {
        auth: Loadable::Loaded(AuthSnapshot::signed_in(UserIdentity::new(user))),
        ..SourceSnapshot::default()
    }
}

/// Signed in, organization selected, every other source loaded and permissive.
pub fn fully_loaded(user: &str, unlocked: &[&str]) -> SourceSnapshot {
    SourceSnapshot {
        organization: Loadable::Loaded(OrganizationSnapshot::new(Some(OrganizationId::from(
            "org-1",
        )))),
        sections: Loadable::Loaded(unlocked.iter().map(|p| (*p, true)).collect::<SectionAccess>()),
        subscription: Loadable::Loaded(SubscriptionStatus::active("pro")),
        role: Loadable::Loaded(Some(Role::Owner)),
        ..signed_in(user)
    }
}

/// Role lookup with per-user answers. Users registered with `hold` block
/// until their `Notify` fires.
#[derive(Default)]
pub struct ScriptedLookup {
    answers: HashMap<String, Result<bool, LookupError>>,
    held: HashMap<String, Arc<Notify>>,
    calls: AtomicUsize,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, user: &str, result: Result<bool, LookupError>) -> Self {
        self.answers.insert(user.to_string(), result);
        self
    }

    pub fn hold(mut self, user: &str, release: Arc<Notify>) -> Self {
        self.held.insert(user.to_string(), release);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RoleAssignmentLookup for ScriptedLookup {
    async fn check_role(&self, user_id: &UserId, _role_name: &str) -> Result<bool, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(release) = self.held.get(user_id.as_str()) {
            release.notified().await;
        }
        self.answers
            .get(user_id.as_str())
            .cloned()
            .unwrap_or(Ok(false))
    }
}

pub fn query_failed() -> LookupError {
    LookupError::QueryFailed {
        message: "permission denied for table user_roles".to_string(),
    }
}
