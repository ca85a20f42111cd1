//! Authentication and route-scoped authorization.
//!
//! ## Module Organization
//!
//! - `authenticate`: Caller identity from the configured method (single user, proxy)
//! - `catalog`: Read-only access to pages, permissions, roles and grants
//! - `decision`: Allow/deny outcome and deny diagnostics
//! - `depot`: Helpers for the authenticated identity in Salvo requests
//! - `privilege`: Super Admin and Super User predicates
//! - `resolver`: Route permission resolution (`PermissionResolver`)

pub mod authenticate;
pub mod catalog;
pub mod decision;
pub mod depot;
pub mod privilege;
pub mod resolver;

pub use catalog::{InMemoryCatalog, PermissionCatalog, PgCatalog};
pub use decision::{Decision, DenyDiagnostics, DenyReason, Grant, GrantMatch};
pub use depot::{DepotIdentity, get_grant_from_depot, get_identity_from_depot};
pub use privilege::PrivilegeRules;
pub use resolver::{PermissionResolver, PermissionResolverHandler, get_resolver_from_depot};
