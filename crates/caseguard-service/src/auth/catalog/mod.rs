//! The read-only catalog seam the resolver depends on.
//!
//! `PgCatalog` serves production from Postgres; `InMemoryCatalog` holds the
//! same rows in vectors for tests and local runs. Implementations apply the
//! active-ness filters of pages, permissions and roles and match the identity
//! under all of its lookup keys. Allow flags, action keys and route matching
//! are evaluated by the resolver.

pub mod memory;
pub mod pg;

use salvo::async_trait;

use caseguard_core::identity::Identity;
use caseguard_db::error::DbResult;
use caseguard_db::model::catalog::grant::GrantRow;
use caseguard_db::model::catalog::{Page, Permission};
use caseguard_db::model::profile::{AdminProfile, UserAccount};

pub use memory::InMemoryCatalog;
pub use pg::PgCatalog;

#[async_trait]
pub trait PermissionCatalog: Send + Sync {
    /// Staff profiles backing the Super Admin predicate, matched by account
    /// reference or case-insensitively by contact address.
    async fn admin_profiles(&self, identity: &Identity) -> DbResult<Vec<AdminProfile>>;

    /// Application accounts backing the Super User predicate.
    async fn user_accounts(&self, identity: &Identity) -> DbResult<Vec<UserAccount>>;

    /// Direct overrides for the identity on active permissions of active pages.
    async fn user_permission_grants(&self, identity: &Identity) -> DbResult<Vec<GrantRow>>;

    /// Role grants for the identity through active roles, on active permissions of active pages.
    async fn role_permission_grants(&self, identity: &Identity) -> DbResult<Vec<GrantRow>>;

    /// Every active permission with its active page, independent of identity.
    async fn active_permissions(&self) -> DbResult<Vec<(Page, Permission)>>;

    /// Raw number of override rows keyed to the identity.
    async fn user_permission_row_count(&self, identity: &Identity) -> DbResult<i64>;
}
