//! The `Gate` trait and the built-in gates.

pub mod auth;
pub mod elevated;
pub mod role;
pub mod section;
pub mod subscription;

use gatehouse_core::{Readiness, SourceSet, SourceSnapshot};

use crate::outcome::GateOutcome;

/// Everything a gate may read during evaluation.
#[derive(Debug, Clone, Copy)]
pub struct GateContext<'a> {
    pub sources: &'a SourceSnapshot,
    /// Route being rendered.
    pub path: &'a str,
}

impl<'a> GateContext<'a> {
    pub fn new(sources: &'a SourceSnapshot, path: &'a str) -> Self {
        Self { sources, path }
    }

    pub fn readiness(&self) -> Readiness<'a> {
        Readiness::compose(&self.sources.auth, &self.sources.organization)
    }
}

/// A route guard. Implementations read sources, never write them, and never
/// fail: every failure is folded into a denial.
pub trait Gate: Send + Sync {
    /// What the gate renders on a hiding denial. Redirecting gates use `()`.
    type Fallback: Clone + PartialEq + Send + Sync + 'static;

    fn name(&self) -> &'static str;

    /// Sources this gate may wait on.
    fn dependencies(&self) -> SourceSet;

    fn evaluate(&self, ctx: &GateContext<'_>) -> GateOutcome<Self::Fallback>;
}
