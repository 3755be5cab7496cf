//! Watchers re-evaluate on source changes and publish only transitions.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{query_failed, ScriptedLookup};
use gatehouse_core::{GateConfig, OrganizationId, Role, SourceHub, UserId, UserIdentity};
use gatehouse_guards::{
    watch_elevated, watch_gate, ElevatedPrivilegeGate, GateOutcome, GuardChain, SharedGate,
};
use tokio::sync::Notify;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn sign_in_with_org(hub: &SourceHub, user: &str) {
    hub.sign_in(UserIdentity::new(user));
    hub.organization.initialize(Some(OrganizationId::from("org-1")));
}

#[tokio::test]
async fn protected_route_resolves_after_sources_load() {
    let hub = SourceHub::new();
    let chain = Arc::new(GuardChain::protected(&GateConfig::default()));
    let mut handle = watch_gate(chain, "/leads", hub.changes());
    assert!(handle.current().is_loading());

    sign_in_with_org(&hub, "u-1");
    hub.sections.load([("/leads", true)].into_iter().collect());

    let outcome = timeout(WAIT, handle.wait_for(|o| !o.is_loading()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome, GateOutcome::Children);
}

#[tokio::test]
async fn unrelated_source_change_is_not_republished() {
    let hub = SourceHub::new();
    sign_in_with_org(&hub, "u-1");
    hub.sections.load([("/leads", true)].into_iter().collect());

    let chain = Arc::new(GuardChain::protected(&GateConfig::default()));
    let handle = watch_gate(chain, "/leads", hub.changes());
    assert!(handle.current().renders_children());

    let mut outcomes = handle.subscribe();
    let _ = outcomes.borrow_and_update();
    hub.roles.resolve(Some(Role::Member));
    settle().await;
    assert!(!outcomes.has_changed().unwrap());
    assert!(!handle.is_finished());
}

#[tokio::test]
async fn sign_out_redirects_to_sign_in() {
    let hub = SourceHub::new();
    sign_in_with_org(&hub, "u-1");
    hub.sections.load([("/leads", true)].into_iter().collect());

    let chain = Arc::new(GuardChain::protected(&GateConfig::default()));
    let mut handle = watch_gate(chain, "/leads", hub.changes());

    hub.sign_out();
    let outcome = timeout(WAIT, handle.wait_for(GateOutcome::is_redirect))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.redirect_target(), Some("/auth"));
}

#[tokio::test]
async fn locked_section_unlocked_at_runtime() {
    let hub = SourceHub::new();
    sign_in_with_org(&hub, "u-1");
    hub.sections.load(gatehouse_core::SectionAccess::new());

    let chain = Arc::new(GuardChain::protected(&GateConfig::default()));
    let mut handle = watch_gate(chain, "/tasks", hub.changes());
    assert_eq!(handle.current(), GateOutcome::redirect("/"));

    hub.sections.unlock("/tasks");
    let outcome = timeout(WAIT, handle.wait_for(GateOutcome::renders_children))
        .await
        .unwrap();
    assert!(outcome.is_some());
}

#[tokio::test]
async fn elevated_watcher_grants_after_lookup() {
    let hub = SourceHub::new();
    hub.sign_in(UserIdentity::new("root"));
    let lookup = Arc::new(ScriptedLookup::new().answer("root", Ok(true)));
    let gate = Arc::new(ElevatedPrivilegeGate::default());

    let mut handle = watch_elevated(Arc::clone(&gate), Arc::clone(&gate), Arc::clone(&lookup), "/admin", hub.changes());
    let outcome = timeout(WAIT, handle.wait_for(|o| !o.is_loading()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome, GateOutcome::Children);
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn elevated_watcher_fails_closed_on_error() {
    let hub = SourceHub::new();
    hub.sign_in(UserIdentity::new("u-1"));
    let lookup = Arc::new(ScriptedLookup::new().answer("u-1", Err(query_failed())));
    let gate = Arc::new(ElevatedPrivilegeGate::default());

    let mut handle = watch_elevated(Arc::clone(&gate), Arc::clone(&gate), lookup, "/admin", hub.changes());
    let outcome = timeout(WAIT, handle.wait_for(|o| !o.is_loading()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome, GateOutcome::redirect("/"));
    assert_eq!(gate.failed_checks(), 1);
}

#[tokio::test]
async fn elevated_watcher_drops_stale_grant_on_user_switch() {
    let hub = SourceHub::new();
    hub.sign_in(UserIdentity::new("alice"));
    let release_alice = Arc::new(Notify::new());
    let lookup = Arc::new(
        ScriptedLookup::new()
            .answer("alice", Ok(true))
            .hold("alice", Arc::clone(&release_alice))
            .answer("bob", Ok(false)),
    );
    let gate = Arc::new(ElevatedPrivilegeGate::default());
    let mut handle = watch_elevated(Arc::clone(&gate), Arc::clone(&gate), Arc::clone(&lookup), "/admin", hub.changes());

    while lookup.calls() < 1 {
        tokio::task::yield_now().await;
    }
    hub.sign_in(UserIdentity::new("bob"));
    let outcome = timeout(WAIT, handle.wait_for(GateOutcome::is_redirect))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome, GateOutcome::redirect("/"));

    let mut outcomes = handle.subscribe();
    let _ = outcomes.borrow_and_update();
    release_alice.notify_one();
    settle().await;
    assert!(!outcomes.has_changed().unwrap());
    assert_eq!(handle.current(), GateOutcome::redirect("/"));
}

#[tokio::test]
async fn chained_super_admin_route_issues_lookup() {
    let hub = SourceHub::new();
    sign_in_with_org(&hub, "root");
    hub.sections.load([("/admin", true)].into_iter().collect());
    let lookup = Arc::new(ScriptedLookup::new().answer("root", Ok(true)));

    let elevated = Arc::new(ElevatedPrivilegeGate::default());
    let chain = Arc::new(
        GuardChain::protected(&GateConfig::default()).then_shared(Arc::clone(&elevated) as SharedGate),
    );
    let mut handle = watch_elevated(chain, Arc::clone(&elevated), Arc::clone(&lookup), "/admin", hub.changes());

    let outcome = timeout(WAIT, handle.wait_for(|o| !o.is_loading()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome, GateOutcome::Children);
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn chained_route_denies_without_assignment() {
    let hub = SourceHub::new();
    sign_in_with_org(&hub, "u-1");
    hub.sections.load([("/admin", true)].into_iter().collect());
    let lookup = Arc::new(ScriptedLookup::new().answer("u-1", Ok(false)));

    let elevated = Arc::new(ElevatedPrivilegeGate::default());
    let chain: SharedGate = Arc::new(
        GuardChain::protected(&GateConfig::default()).then_shared(Arc::clone(&elevated) as SharedGate),
    );
    let mut handle = watch_elevated(chain, elevated, lookup, "/admin", hub.changes());

    let outcome = timeout(WAIT, handle.wait_for(GateOutcome::is_redirect))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.redirect_target(), Some("/"));
}

#[tokio::test]
async fn dropping_handle_cancels_lookup_in_flight() {
    let hub = SourceHub::new();
    hub.sign_in(UserIdentity::new("root"));
    let release = Arc::new(Notify::new());
    let lookup = Arc::new(
        ScriptedLookup::new()
            .answer("root", Ok(true))
            .hold("root", Arc::clone(&release)),
    );
    let gate = Arc::new(ElevatedPrivilegeGate::default());
    let handle = watch_elevated(Arc::clone(&gate), Arc::clone(&gate), Arc::clone(&lookup), "/admin", hub.changes());

    while lookup.calls() < 1 {
        tokio::task::yield_now().await;
    }
    drop(handle);

    // Both the watcher and its lookup task release their clones once cancelled.
    timeout(WAIT, async {
        while Arc::strong_count(&lookup) > 1 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    release.notify_one();
    settle().await;
    assert!(gate.observe_identity(Some(&UserId::from("root"))).is_none());
    assert_eq!(gate.failed_checks(), 0);
}
