//! Role gate: hides content from callers outside an allow-set.

use gatehouse_core::{RoleSet, SourceKind, SourceSet};

use crate::evaluator::decide;
use crate::outcome::{GateOutcome, LoadingIndicator};

use super::{Gate, GateContext};

/// Renders children only for allowed roles.
///
/// Unlike the other gates this one hides instead of redirecting: denial
/// renders the fallback (nothing by default), and while the role is loading
/// it renders nothing rather than a spinner.
#[derive(Debug, Clone)]
pub struct RoleGate<F = ()> {
    roles: RoleSet,
    fallback: Option<F>,
}

impl<F> RoleGate<F> {
    pub fn new(roles: RoleSet) -> Self {
        Self {
            roles,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: F) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn roles(&self) -> RoleSet {
        self.roles
    }
}

impl<F> Gate for RoleGate<F>
where
    F: Clone + PartialEq + Send + Sync + 'static,
{
    type Fallback = F;

    fn name(&self) -> &'static str {
        "role"
    }

    fn dependencies(&self) -> SourceSet {
        SourceSet::of(&[SourceKind::Role])
    }

    fn evaluate(&self, ctx: &GateContext<'_>) -> GateOutcome<F> {
        let role = &ctx.sources.role;
        decide(
            role.is_pending(),
            LoadingIndicator::Silent,
            || {
                role.as_loaded()
                    .copied()
                    .flatten()
                    .is_some_and(|r| self.roles.contains(r))
            },
            || GateOutcome::Fallback {
                content: self.fallback.clone(),
            },
        )
    }
}
