//! Auth session and subscription status.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::identity::{UserId, UserIdentity};
use crate::loadable::Loadable;
use crate::source::{SourceCell, SourceReceiver};

/// Resolved auth session. `user` is `None` once the session is known to be
/// signed out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    pub user: Option<UserIdentity>,
}

impl AuthSnapshot {
    pub fn signed_in(user: UserIdentity) -> Self {
        Self { user: Some(user) }
    }

    pub fn signed_out() -> Self {
        Self { user: None }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.id)
    }
}

/// Billing status for the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    pub subscribed: bool,
    /// Plan name reported by the billing backend, if any.
    #[serde(default)]
    pub plan: Option<String>,
}

impl SubscriptionStatus {
    pub fn active(plan: impl Into<String>) -> Self {
        Self {
            subscribed: true,
            plan: Some(plan.into()),
        }
    }

    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Writer for the auth session and subscription sources.
#[derive(Debug)]
pub struct AuthStore {
    session: SourceCell<AuthSnapshot>,
    subscription: SourceCell<SubscriptionStatus>,
}

impl AuthStore {
    pub fn new() -> Self {
        Self {
            session: SourceCell::new("auth"),
            subscription: SourceCell::new("subscription"),
        }
    }

    /// Publish a signed-in session. When the identity changes, the previous
    /// user's subscription is dropped before the new user becomes visible.
    ///
    /// Crate-private: the other per-user sources must be cleared too, which
    /// [`SourceHub::sign_in`](super::SourceHub::sign_in) does.
    pub(crate) fn sign_in(&self, user: UserIdentity) {
        let previous = self.session.snapshot();
        let same_user = previous
            .as_loaded()
            .and_then(|s| s.user_id())
            .is_some_and(|id| *id == user.id);
        if !same_user {
            self.subscription.reset();
        }
        info!(user_id = %user.id, "session signed in");
        self.session.publish(Loadable::Loaded(AuthSnapshot::signed_in(user)));
    }

    pub(crate) fn sign_out(&self) {
        self.subscription.reset();
        if self.session.publish(Loadable::Loaded(AuthSnapshot::signed_out())) {
            info!("session signed out");
        }
    }

    pub fn set_subscription(&self, status: SubscriptionStatus) {
        self.subscription.publish(Loadable::Loaded(status));
    }

    pub fn session(&self) -> Loadable<AuthSnapshot> {
        self.session.snapshot()
    }

    pub fn subscription(&self) -> Loadable<SubscriptionStatus> {
        self.subscription.snapshot()
    }

    pub fn subscribe_session(&self) -> SourceReceiver<AuthSnapshot> {
        self.session.subscribe()
    }

    pub fn subscribe_subscription(&self) -> SourceReceiver<SubscriptionStatus> {
        self.subscription.subscribe()
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}
