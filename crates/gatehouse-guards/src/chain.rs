//! Gate stacks per route.
//!
//! The application wraps protected routes in several gates (auth outermost,
//! then section, then subscription). A `GuardChain` evaluates them in order
//! and stops at the first gate that does not render children.

use std::sync::Arc;

use gatehouse_core::state::normalize_path;
use gatehouse_core::{GateConfig, GateError, GateResult, SourceSet, SourceSnapshot};
use tracing::debug;

use crate::gates::auth::AuthGate;
use crate::gates::section::SectionGate;
use crate::gates::subscription::SubscriptionGate;
use crate::gates::{Gate, GateContext};
use crate::outcome::GateOutcome;

/// A gate that redirects rather than hides, shareable across routes.
pub type SharedGate = Arc<dyn Gate<Fallback = ()>>;

/// Ordered stack of gates. An empty chain renders children.
#[derive(Clone, Default)]
pub struct GuardChain {
    gates: Vec<SharedGate>,
}

impl GuardChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Auth, then section access.
    pub fn protected(config: &GateConfig) -> Self {
        Self::new()
            .then(AuthGate::new(config))
            .then(SectionGate::new(config))
    }

    /// Auth, section access, then subscription.
    pub fn paid(config: &GateConfig) -> Self {
        Self::protected(config).then(SubscriptionGate::new(config))
    }

    pub fn then<G>(self, gate: G) -> Self
    where
        G: Gate<Fallback = ()> + 'static,
    {
        self.then_shared(Arc::new(gate))
    }

    pub fn then_shared(mut self, gate: SharedGate) -> Self {
        self.gates.push(gate);
        self
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn gate_names(&self) -> Vec<&'static str> {
        self.gates.iter().map(|g| g.name()).collect()
    }
}

impl std::fmt::Debug for GuardChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardChain")
            .field("gates", &self.gate_names())
            .finish()
    }
}

impl Gate for GuardChain {
    type Fallback = ();

    fn name(&self) -> &'static str {
        "chain"
    }

    fn dependencies(&self) -> SourceSet {
        self.gates
            .iter()
            .flat_map(|g| g.dependencies().iter().collect::<Vec<_>>())
            .fold(SourceSet::empty(), SourceSet::with)
    }

    fn evaluate(&self, ctx: &GateContext<'_>) -> GateOutcome {
        for gate in &self.gates {
            let outcome = gate.evaluate(ctx);
            if !outcome.renders_children() {
                debug!(gate = gate.name(), path = ctx.path, outcome = outcome.kind(), "chain stopped");
                return outcome;
            }
        }
        GateOutcome::Children
    }
}

/// Maps route prefixes to guard chains.
///
/// The longest registered prefix (matched on whole path segments) decides;
/// unmatched paths use the fallback chain.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<(String, GuardChain)>,
    fallback: GuardChain,
}

impl RouteTable {
    pub fn new(fallback: GuardChain) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
        }
    }

    /// Register `chain` for `prefix` and everything below it.
    pub fn route(mut self, prefix: &str, chain: GuardChain) -> GateResult<Self> {
        if !prefix.starts_with('/') {
            return Err(GateError::InvalidRoute {
                path: prefix.to_string(),
            });
        }
        let key = normalize_path(prefix);
        self.routes.retain(|(existing, _)| *existing != key);
        self.routes.push((key, chain));
        Ok(self)
    }

    pub fn chain_for(&self, path: &str) -> &GuardChain {
        let path = normalize_path(path);
        self.routes
            .iter()
            .filter(|(prefix, _)| segment_prefix(prefix, &path))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, chain)| chain)
            .unwrap_or(&self.fallback)
    }

    /// Evaluate the chain guarding `path` against `sources`.
    pub fn resolve(&self, path: &str, sources: &SourceSnapshot) -> GateOutcome {
        let chain = self.chain_for(path);
        chain.evaluate(&GateContext::new(sources, path))
    }
}

fn segment_prefix(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_prefix_matches_whole_segments() {
        assert!(segment_prefix("/leads", "/leads"));
        assert!(segment_prefix("/leads", "/leads/42"));
        assert!(!segment_prefix("/leads", "/leaderboard"));
        assert!(segment_prefix("/", "/anything"));
    }

    #[test]
    fn relative_prefix_rejected() {
        let err = RouteTable::default()
            .route("leads", GuardChain::new())
            .unwrap_err();
        assert!(matches!(err, GateError::InvalidRoute { .. }));
    }

    #[test]
    fn chain_dependencies_are_union() {
        let chain = GuardChain::paid(&GateConfig::default());
        let deps = chain.dependencies();
        assert_eq!(deps.iter().count(), 4);
        assert_eq!(chain.gate_names(), vec!["auth", "section", "subscription"]);
    }

    #[test]
    fn empty_chain_renders_children() {
        let sources = SourceSnapshot::default();
        let outcome = GuardChain::new().evaluate(&GateContext::new(&sources, "/"));
        assert!(outcome.renders_children());
    }
}
