//! Source state types and the stores that own them.
//!
//! Each store is the single writer for its source; gates only ever read
//! snapshots or subscribe to changes.

pub mod auth;
pub mod hub;
pub mod organization;
pub mod role;
pub mod section_access;

pub use auth::{AuthSnapshot, AuthStore, SubscriptionStatus};
pub use hub::{HubChanges, SourceHub};
pub use organization::{OrganizationSnapshot, OrganizationStore};
pub use role::RoleStore;
pub use section_access::{normalize_path, SectionAccess, SectionAccessStore};
