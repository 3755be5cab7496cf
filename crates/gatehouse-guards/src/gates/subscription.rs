//! Subscription gate: requires an active subscription.

use gatehouse_core::{GateConfig, SourceKind, SourceSet};

use crate::evaluator::{decide, require_user, spinner};
use crate::outcome::GateOutcome;

use super::{Gate, GateContext};

#[derive(Debug, Clone)]
pub struct SubscriptionGate {
    sign_in: String,
    pricing: String,
    auth_message: String,
    subscription_message: String,
}

impl SubscriptionGate {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            sign_in: config.routes.sign_in.clone(),
            pricing: config.routes.pricing.clone(),
            auth_message: config.messages.auth.clone(),
            subscription_message: config.messages.subscription.clone(),
        }
    }
}

impl Default for SubscriptionGate {
    fn default() -> Self {
        Self::new(&GateConfig::default())
    }
}

impl Gate for SubscriptionGate {
    type Fallback = ();

    fn name(&self) -> &'static str {
        "subscription"
    }

    fn dependencies(&self) -> SourceSet {
        SourceSet::of(&[SourceKind::Auth, SourceKind::Subscription])
    }

    fn evaluate(&self, ctx: &GateContext<'_>) -> GateOutcome {
        let readiness = ctx.readiness();
        if let Err(outcome) = require_user(&readiness, &self.sign_in, &self.auth_message) {
            return outcome;
        }
        let subscription = &ctx.sources.subscription;
        decide(
            subscription.is_pending(),
            spinner(&self.subscription_message),
            || subscription.as_loaded().is_some_and(|s| s.subscribed),
            || GateOutcome::redirect(&self.pricing),
        )
    }
}
