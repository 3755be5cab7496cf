//! Authentication gate: signed in with an organization selected.

use gatehouse_core::{GateConfig, SourceKind, SourceSet};

use crate::evaluator::require_user;
use crate::outcome::GateOutcome;

use super::{Gate, GateContext};

/// Requires a user and a resolved organization.
///
/// A missing user redirects to sign-in. A missing organization is never a
/// denial: the gate keeps loading, since an organization picker may be shown
/// out-of-band.
#[derive(Debug, Clone)]
pub struct AuthGate {
    sign_in: String,
    auth_message: String,
    organization_message: String,
}

impl AuthGate {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            sign_in: config.routes.sign_in.clone(),
            auth_message: config.messages.auth.clone(),
            organization_message: config.messages.organization.clone(),
        }
    }
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new(&GateConfig::default())
    }
}

impl Gate for AuthGate {
    type Fallback = ();

    fn name(&self) -> &'static str {
        "auth"
    }

    fn dependencies(&self) -> SourceSet {
        SourceSet::of(&[SourceKind::Auth, SourceKind::Organization])
    }

    fn evaluate(&self, ctx: &GateContext<'_>) -> GateOutcome {
        let readiness = ctx.readiness();
        if let Err(outcome) = require_user(&readiness, &self.sign_in, &self.auth_message) {
            return outcome;
        }
        if !readiness.is_ready() {
            return GateOutcome::spinner(self.organization_message.as_str());
        }
        GateOutcome::Children
    }
}
