//! The shared decision procedure every gate runs.
//!
//! Precedence is fixed: pending sources yield loading, a failed predicate
//! yields the gate's denial, anything else renders children. A redirect is
//! therefore only ever produced from fully loaded state.

use gatehouse_core::{Readiness, UserIdentity};

use crate::outcome::{GateOutcome, LoadingIndicator};

/// Evaluate a gate's predicate once its sources are loaded.
pub fn decide<F>(
    pending: bool,
    loading: LoadingIndicator,
    allowed: impl FnOnce() -> bool,
    denied: impl FnOnce() -> GateOutcome<F>,
) -> GateOutcome<F> {
    if pending {
        return GateOutcome::Loading { indicator: loading };
    }
    if allowed() {
        GateOutcome::Children
    } else {
        denied()
    }
}

/// Resolve the signed-in user, or the outcome to show instead.
///
/// Auth still pending is loading. A resolved session without a user is a
/// redirect to `sign_in`.
pub fn require_user<'a, F>(
    readiness: &Readiness<'a>,
    sign_in: &str,
    auth_message: &str,
) -> Result<&'a UserIdentity, GateOutcome<F>> {
    if !readiness.auth_resolved() {
        return Err(GateOutcome::spinner(auth_message));
    }
    readiness
        .user()
        .ok_or_else(|| GateOutcome::redirect(sign_in))
}

pub(crate) fn spinner(message: &str) -> LoadingIndicator {
    LoadingIndicator::Spinner {
        message: message.to_string(),
    }
}
