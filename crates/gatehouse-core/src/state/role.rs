//! Caller's role in the current organization.

use tracing::debug;

use crate::loadable::Loadable;
use crate::role::Role;
use crate::source::{SourceCell, SourceReceiver};

/// Writer for the role source. `Loaded(None)` means the caller has no
/// membership in the current organization.
#[derive(Debug)]
pub struct RoleStore {
    cell: SourceCell<Option<Role>>,
}

impl RoleStore {
    pub fn new() -> Self {
        Self {
            cell: SourceCell::new("role"),
        }
    }

    pub fn resolve(&self, role: Option<Role>) {
        debug!(role = role.map(|r| r.as_str()), "role resolved");
        self.cell.publish(Loadable::Loaded(role));
    }

    pub fn clear(&self) {
        self.cell.reset();
    }

    pub fn snapshot(&self) -> Loadable<Option<Role>> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> SourceReceiver<Option<Role>> {
        self.cell.subscribe()
    }
}

impl Default for RoleStore {
    fn default() -> Self {
        Self::new()
    }
}
