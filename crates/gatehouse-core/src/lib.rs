//! # gatehouse-core
//!
//! Foundation crate for the gatehouse access layer.
//! Defines the loadable source model, identities, roles, observable source
//! stores, the readiness composer, errors, config, and tracing setup.
//! `gatehouse-guards` builds every gate on top of this crate.

pub mod config;
pub mod errors;
pub mod identity;
pub mod loadable;
pub mod readiness;
pub mod role;
pub mod snapshot;
pub mod source;
pub mod state;
pub mod tracing;

// Re-export the most commonly used types at the crate root.
pub use config::GateConfig;
pub use errors::error_code::GateErrorCode;
pub use errors::{GateError, GateResult, LookupError, SourceClosed};
pub use identity::{OrganizationId, UserId, UserIdentity};
pub use loadable::Loadable;
pub use readiness::Readiness;
pub use role::{Role, RoleSet};
pub use snapshot::{SourceKind, SourceSet, SourceSnapshot};
pub use source::{SourceCell, SourceReceiver};
pub use state::{
    AuthSnapshot, AuthStore, HubChanges, OrganizationSnapshot, OrganizationStore, RoleStore,
    SectionAccess, SectionAccessStore, SourceHub, SubscriptionStatus,
};
