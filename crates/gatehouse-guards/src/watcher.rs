//! Re-evaluate gates as their sources change.
//!
//! A watcher owns a [`HubChanges`] reader, re-runs the gate on every publish,
//! and forwards the outcome on a `watch` channel only when it differs from the
//! last one, so consumers never see a repeated transition.

use std::sync::Arc;

use gatehouse_core::{HubChanges, SourceSnapshot};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, warn};

use crate::gates::elevated::{ElevatedPrivilegeGate, RoleAssignmentLookup};
use crate::gates::{Gate, GateContext};
use crate::outcome::GateOutcome;

/// Running watcher. Dropping the handle stops the watcher.
#[derive(Debug)]
pub struct WatchHandle<F> {
    outcomes: watch::Receiver<GateOutcome<F>>,
    task: JoinHandle<()>,
}

impl<F: Clone> WatchHandle<F> {
    /// Latest outcome.
    pub fn current(&self) -> GateOutcome<F> {
        self.outcomes.borrow().clone()
    }

    /// A new receiver for the outcome stream.
    pub fn subscribe(&self) -> watch::Receiver<GateOutcome<F>> {
        self.outcomes.clone()
    }

    /// Wait until an outcome satisfies `predicate`. `None` if the watcher
    /// stopped first.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&GateOutcome<F>) -> bool,
    ) -> Option<GateOutcome<F>> {
        self.outcomes
            .wait_for(predicate)
            .await
            .ok()
            .map(|outcome| outcome.clone())
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}

impl<F> Drop for WatchHandle<F> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Watch `gate` for the route at `path`. Must be called inside a tokio runtime.
pub fn watch_gate<G>(gate: Arc<G>, path: impl Into<String>, mut changes: HubChanges) -> WatchHandle<G::Fallback>
where
    G: Gate + ?Sized + 'static,
{
    let path = path.into();
    let initial = evaluate(&*gate, &changes.snapshot(), &path);
    let (tx, outcomes) = watch::channel(initial);

    let task = tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let snapshot = changes.snapshot();
            publish(&tx, gate.name(), evaluate(&*gate, &snapshot, &path));
        }
        debug!(gate = gate.name(), "sources closed; watcher stopping");
    });

    WatchHandle { outcomes, task }
}

/// Watch `gate` for a route guarded by `elevated`, issuing one lookup per
/// identity change.
///
/// `gate` is what gets evaluated: either `elevated` itself or a chain that
/// contains it (for example `GuardChain::protected(..).then_shared(elevated)`).
/// An elevated gate evaluated anywhere else never leaves loading, since only
/// this watcher (or [`ElevatedPrivilegeGate::refresh`]) issues lookups.
///
/// Lookups run on a `JoinSet` owned by the watcher task, so stopping or
/// dropping the handle cancels any lookup still in flight. A result that
/// arrives after a newer identity was observed is discarded by the gate's
/// generation check.
pub fn watch_elevated<G, L>(
    gate: Arc<G>,
    elevated: Arc<ElevatedPrivilegeGate>,
    lookup: Arc<L>,
    path: impl Into<String>,
    mut changes: HubChanges,
) -> WatchHandle<G::Fallback>
where
    G: Gate + ?Sized + 'static,
    L: RoleAssignmentLookup + 'static,
{
    let path = path.into();
    let mut lookups = JoinSet::new();

    let snapshot = changes.snapshot();
    begin_check(&elevated, &lookup, &mut lookups, &snapshot);
    let (tx, outcomes) = watch::channel(evaluate(&*gate, &snapshot, &path));

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                r = changes.changed() => {
                    if r.is_err() {
                        break;
                    }
                }
                Some(joined) = lookups.join_next(), if !lookups.is_empty() => {
                    match joined {
                        Ok(true) => {}
                        // Stale result, nothing new to show.
                        Ok(false) => continue,
                        Err(e) => {
                            warn!(gate = gate.name(), error = %e, "elevated lookup task ended abnormally");
                            continue;
                        }
                    }
                }
            }
            let snapshot = changes.snapshot();
            begin_check(&elevated, &lookup, &mut lookups, &snapshot);
            publish(&tx, gate.name(), evaluate(&*gate, &snapshot, &path));
        }
        debug!(gate = gate.name(), "sources closed; watcher stopping");
    });

    WatchHandle { outcomes, task }
}

fn begin_check<L>(
    elevated: &Arc<ElevatedPrivilegeGate>,
    lookup: &Arc<L>,
    lookups: &mut JoinSet<bool>,
    snapshot: &SourceSnapshot,
) where
    L: RoleAssignmentLookup + 'static,
{
    // Identity is unknown until auth reports.
    let Some(auth) = snapshot.auth.as_loaded() else {
        return;
    };
    let Some(ticket) = elevated.observe_identity(auth.user_id()) else {
        return;
    };

    let elevated = Arc::clone(elevated);
    let lookup = Arc::clone(lookup);
    lookups.spawn(async move { elevated.run_check(&*lookup, ticket).await });
}

fn evaluate<G>(gate: &G, snapshot: &SourceSnapshot, path: &str) -> GateOutcome<G::Fallback>
where
    G: Gate + ?Sized,
{
    gate.evaluate(&GateContext::new(snapshot, path))
}

fn publish<F: PartialEq>(tx: &watch::Sender<GateOutcome<F>>, gate: &'static str, outcome: GateOutcome<F>) {
    tx.send_if_modified(|current| {
        if *current == outcome {
            return false;
        }
        debug!(gate, from = current.kind(), to = outcome.kind(), "gate transition");
        *current = outcome;
        true
    });
}
