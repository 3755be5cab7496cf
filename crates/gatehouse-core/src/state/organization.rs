//! Current organization selection.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::identity::OrganizationId;
use crate::loadable::Loadable;
use crate::source::{SourceCell, SourceReceiver};

/// Initialized organization state. `organization_id` is `None` when the user
/// has not picked one yet (a selection prompt may be showing).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSnapshot {
    pub organization_id: Option<OrganizationId>,
}

impl OrganizationSnapshot {
    pub fn new(organization_id: Option<OrganizationId>) -> Self {
        Self { organization_id }
    }
}

/// Writer for the organization source.
///
/// Once initialized the source stays initialized: switching organizations
/// publishes the new ID in one step and never passes back through
/// `NotLoaded`. Only [`OrganizationStore::clear`] (sign-out) resets it.
#[derive(Debug)]
pub struct OrganizationStore {
    cell: SourceCell<OrganizationSnapshot>,
}

impl OrganizationStore {
    pub fn new() -> Self {
        Self {
            cell: SourceCell::new("organization"),
        }
    }

    /// Finish initial resolution, with or without a selected organization.
    pub fn initialize(&self, organization_id: Option<OrganizationId>) {
        debug!(organization_id = ?organization_id, "organization initialized");
        self.cell
            .publish(Loadable::Loaded(OrganizationSnapshot::new(organization_id)));
    }

    pub fn switch_to(&self, organization_id: OrganizationId) -> bool {
        let changed = self
            .cell
            .publish(Loadable::Loaded(OrganizationSnapshot::new(Some(
                organization_id.clone(),
            ))));
        if changed {
            info!(organization_id = %organization_id, "organization switched");
        }
        changed
    }

    pub fn clear(&self) {
        self.cell.reset();
    }

    pub fn snapshot(&self) -> Loadable<OrganizationSnapshot> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> SourceReceiver<OrganizationSnapshot> {
        self.cell.subscribe()
    }
}

impl Default for OrganizationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_never_passes_through_not_loaded() {
        let store = OrganizationStore::new();
        store.initialize(Some(OrganizationId::from("org-1")));
        let mut rx = store.subscribe();
        let _ = rx.current();

        assert!(store.switch_to(OrganizationId::from("org-2")));
        let seen = rx.current();
        assert_eq!(
            seen,
            Loadable::Loaded(OrganizationSnapshot::new(Some("org-2".into())))
        );
    }

    #[test]
    fn switching_to_same_organization_is_a_no_op() {
        let store = OrganizationStore::new();
        store.initialize(Some(OrganizationId::from("org-1")));
        assert!(!store.switch_to(OrganizationId::from("org-1")));
    }
}
