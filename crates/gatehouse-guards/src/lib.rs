//! # gatehouse-guards
//!
//! Route gates for the gatehouse access layer.
//!
//! ## Gates
//! - **auth**: signed in with an organization selected (redirects to sign-in)
//! - **section**: current route unlocked in the per-user section table
//! - **subscription**: active subscription (redirects to pricing)
//! - **role**: caller's organization role in an allow-set (hides, never redirects)
//! - **elevated**: super-admin style check against a role-assignment lookup
//!
//! Every gate evaluates to a [`GateOutcome`] in strict precedence:
//! loading while any required source is pending, then redirect on denial,
//! then children. [`GuardChain`] and [`RouteTable`] stack gates per route, and
//! [`watcher`] re-evaluates them as sources change.

pub mod chain;
pub mod evaluator;
pub mod gates;
pub mod outcome;
pub mod watcher;

pub use chain::{GuardChain, RouteTable, SharedGate};
pub use gates::auth::AuthGate;
pub use gates::elevated::{CheckTicket, ElevatedPrivilegeGate, RoleAssignmentLookup};
pub use gates::role::RoleGate;
pub use gates::section::SectionGate;
pub use gates::subscription::SubscriptionGate;
pub use gates::{Gate, GateContext};
pub use outcome::{GateOutcome, LoadingIndicator};
pub use watcher::{watch_elevated, watch_gate, WatchHandle};
