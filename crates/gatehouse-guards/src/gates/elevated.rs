//! Elevated-privilege gate (super-admin routes).
//!
//! Access requires an explicit asynchronous lookup against the role-assignment
//! records, issued once per identity change. Lookup failures deny access and
//! are logged, never shown.
//!
//! Every lookup is tagged with a generation number. When the identity changes
//! while a lookup is in flight, the generation moves on and the late result is
//! discarded, so a previous user's verdict can never be applied to the next.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use gatehouse_core::{GateConfig, Loadable, LookupError, SourceKind, SourceSet, UserId};
use tracing::{debug, warn};

use crate::evaluator::{decide, require_user, spinner};
use crate::outcome::GateOutcome;

use super::{Gate, GateContext};

/// Backend query: does `user_id` hold a `role_name` assignment?
pub trait RoleAssignmentLookup: Send + Sync {
    fn check_role(
        &self,
        user_id: &UserId,
        role_name: &str,
    ) -> impl Future<Output = Result<bool, LookupError>> + Send;
}

/// Handle for one in-flight lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTicket {
    pub generation: u64,
    pub user_id: UserId,
}

#[derive(Debug)]
struct ElevatedState {
    /// Identity the current verdict belongs to.
    identity: Option<UserId>,
    verdict: Loadable<bool>,
}

/// Gate for super-admin routes.
///
/// Evaluation only reads the verdict; it never issues a lookup. The verdict
/// advances through [`refresh`](Self::refresh) or, for routes on screen,
/// [`watch_elevated`](crate::watcher::watch_elevated), which accepts this gate
/// either alone or inside a [`GuardChain`](crate::chain::GuardChain). Shared
/// through an `Arc`, the same instance can sit in a chain and be driven by the
/// watcher.
pub struct ElevatedPrivilegeGate {
    role_name: String,
    sign_in: String,
    default_route: String,
    auth_message: String,
    elevated_message: String,
    generation: AtomicU64,
    state: Mutex<ElevatedState>,
    failed_checks: AtomicU64,
}

impl ElevatedPrivilegeGate {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            role_name: config.elevated.role_name.clone(),
            sign_in: config.routes.sign_in.clone(),
            default_route: config.routes.default.clone(),
            auth_message: config.messages.auth.clone(),
            elevated_message: config.messages.elevated.clone(),
            generation: AtomicU64::new(0),
            state: Mutex::new(ElevatedState {
                identity: None,
                verdict: Loadable::NotLoaded,
            }),
            failed_checks: AtomicU64::new(0),
        }
    }

    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    /// Number of lookups that failed and were treated as denial.
    pub fn failed_checks(&self) -> u64 {
        self.failed_checks.load(Ordering::Relaxed)
    }

    /// Current generation. Bumped on every identity change.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Record the identity currently signed in.
    ///
    /// Returns a ticket when a new lookup must be issued. The same identity
    /// observed again yields `None`, so each identity is checked once. A
    /// signed-out identity needs no lookup and is denied outright.
    pub fn observe_identity(&self, user_id: Option<&UserId>) -> Option<CheckTicket> {
        let mut state = self.lock_state();
        if state.identity.as_ref() == user_id && state.identity.is_some() {
            return None;
        }
        if user_id.is_none() && state.identity.is_none() && state.verdict.is_loaded() {
            return None;
        }

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        state.identity = user_id.cloned();
        state.verdict = match user_id {
            Some(_) => Loadable::NotLoaded,
            None => Loadable::Loaded(false),
        };
        debug!(generation, user_id = ?user_id, "elevated identity changed");

        user_id.map(|id| CheckTicket {
            generation,
            user_id: id.clone(),
        })
    }

    /// Apply a lookup result. Returns `false` when the ticket is stale and the
    /// result was discarded.
    pub fn complete(&self, ticket: &CheckTicket, result: Result<bool, LookupError>) -> bool {
        let mut state = self.lock_state();
        let current = self.generation.load(Ordering::Acquire);
        if ticket.generation != current || state.identity.as_ref() != Some(&ticket.user_id) {
            debug!(
                ticket_generation = ticket.generation,
                current_generation = current,
                "discarding stale elevated check"
            );
            return false;
        }

        let granted = match result {
            Ok(matched) => matched,
            Err(e) => {
                self.failed_checks.fetch_add(1, Ordering::Relaxed);
                warn!(
                    user_id = %ticket.user_id,
                    role = %self.role_name,
                    error = %e,
                    "elevated privilege check failed; denying access"
                );
                false
            }
        };
        state.verdict = Loadable::Loaded(granted);
        true
    }

    /// Run the lookup for `ticket` and apply the result.
    pub async fn run_check<L>(&self, lookup: &L, ticket: CheckTicket) -> bool
    where
        L: RoleAssignmentLookup,
    {
        let result = lookup.check_role(&ticket.user_id, &self.role_name).await;
        self.complete(&ticket, result)
    }

    /// Observe `user_id` and, if it is new, look it up. Returns whether a
    /// result was applied.
    pub async fn refresh<L>(&self, lookup: &L, user_id: Option<&UserId>) -> bool
    where
        L: RoleAssignmentLookup,
    {
        match self.observe_identity(user_id) {
            Some(ticket) => self.run_check(lookup, ticket).await,
            None => false,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ElevatedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ElevatedPrivilegeGate {
    fn default() -> Self {
        Self::new(&GateConfig::default())
    }
}

impl std::fmt::Debug for ElevatedPrivilegeGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevatedPrivilegeGate")
            .field("role_name", &self.role_name)
            .field("generation", &self.generation())
            .field("failed_checks", &self.failed_checks())
            .finish_non_exhaustive()
    }
}

impl Gate for ElevatedPrivilegeGate {
    type Fallback = ();

    fn name(&self) -> &'static str {
        "elevated"
    }

    fn dependencies(&self) -> SourceSet {
        SourceSet::of(&[SourceKind::Auth])
    }

    fn evaluate(&self, ctx: &GateContext<'_>) -> GateOutcome {
        let readiness = ctx.readiness();
        let user = match require_user(&readiness, &self.sign_in, &self.auth_message) {
            Ok(user) => user,
            Err(outcome) => return outcome,
        };

        // A verdict only counts for the identity it was issued for.
        let verdict = {
            let state = self.lock_state();
            if state.identity.as_ref() == Some(&user.id) {
                state.verdict.clone()
            } else {
                Loadable::NotLoaded
            }
        };
        decide(
            verdict.is_pending(),
            spinner(&self.elevated_message),
            || verdict == Loadable::Loaded(true),
            || GateOutcome::redirect(&self.default_route),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_identity_issues_one_ticket() {
        let gate = ElevatedPrivilegeGate::default();
        let alice = UserId::from("alice");
        assert!(gate.observe_identity(Some(&alice)).is_some());
        assert!(gate.observe_identity(Some(&alice)).is_none());
        assert_eq!(gate.generation(), 1);
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let gate = ElevatedPrivilegeGate::default();
        let alice_ticket = gate.observe_identity(Some(&"alice".into())).unwrap();
        let bob_ticket = gate.observe_identity(Some(&"bob".into())).unwrap();

        assert!(gate.complete(&bob_ticket, Ok(false)));
        assert!(!gate.complete(&alice_ticket, Ok(true)));
    }

    #[test]
    fn signing_out_needs_no_lookup() {
        let gate = ElevatedPrivilegeGate::default();
        gate.observe_identity(Some(&"alice".into()));
        assert!(gate.observe_identity(None).is_none());
        assert!(gate.observe_identity(None).is_none());
        assert_eq!(gate.generation(), 2);
    }

    #[test]
    fn failed_lookup_counts_once() {
        let gate = ElevatedPrivilegeGate::default();
        let ticket = gate.observe_identity(Some(&"alice".into())).unwrap();
        let err = LookupError::QueryFailed {
            message: "relation does not exist".to_string(),
        };
        assert!(gate.complete(&ticket, Err(err.clone())));
        assert!(!gate.complete(&CheckTicket { generation: 0, ..ticket }, Err(err)));
        assert_eq!(gate.failed_checks(), 1);
    }
}
