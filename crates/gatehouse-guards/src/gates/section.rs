//! Section gate: the current route must be unlocked for the user.

use gatehouse_core::{GateConfig, SourceKind, SourceSet};

use crate::evaluator::{decide, require_user, spinner};
use crate::outcome::GateOutcome;

use super::{Gate, GateContext};

/// Checks the route being rendered against the user's section table.
///
/// An unloaded table is loading, not locked: the naive unlocked check on a
/// missing table would redirect during the fetch window.
#[derive(Debug, Clone)]
pub struct SectionGate {
    sign_in: String,
    default_route: String,
    auth_message: String,
    section_message: String,
}

impl SectionGate {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            sign_in: config.routes.sign_in.clone(),
            default_route: config.routes.default.clone(),
            auth_message: config.messages.auth.clone(),
            section_message: config.messages.section.clone(),
        }
    }
}

impl Default for SectionGate {
    fn default() -> Self {
        Self::new(&GateConfig::default())
    }
}

impl Gate for SectionGate {
    type Fallback = ();

    fn name(&self) -> &'static str {
        "section"
    }

    fn dependencies(&self) -> SourceSet {
        SourceSet::of(&[SourceKind::Auth, SourceKind::SectionAccess])
    }

    fn evaluate(&self, ctx: &GateContext<'_>) -> GateOutcome {
        let readiness = ctx.readiness();
        if let Err(outcome) = require_user(&readiness, &self.sign_in, &self.auth_message) {
            return outcome;
        }
        let sections = &ctx.sources.sections;
        decide(
            sections.is_pending(),
            spinner(&self.section_message),
            || {
                sections
                    .as_loaded()
                    .is_some_and(|access| access.is_unlocked(ctx.path))
            },
            || GateOutcome::redirect(&self.default_route),
        )
    }
}
